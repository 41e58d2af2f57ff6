//! perft - performance test for movegen verification
//! counts placement sequences along a queue, no hold

use crate::apply::apply_placement;
use crate::movegen::generate_moves;
use pcfind_core::{Board, Piece};
use rayon::prelude::*;

/// perft - counts leaf nodes at depth
pub fn perft(board: &Board, queue: &[Piece], depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let Some((&piece, rest)) = queue.split_first() else {
        return 1;
    };
    let moves = generate_moves(board, piece);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|p| {
            let (next, _) = apply_placement(board, p);
            perft(&next, rest, depth - 1)
        })
        .sum()
}

/// Parallel perft - splits top-level moves across threads
pub fn perft_parallel(board: &Board, queue: &[Piece], depth: u32) -> u64 {
    if depth <= 1 {
        return perft(board, queue, depth);
    }
    let Some((&piece, rest)) = queue.split_first() else {
        return 1;
    };

    generate_moves(board, piece)
        .par_iter()
        .map(|p| {
            let (next, _) = apply_placement(board, p);
            perft(&next, rest, depth - 1)
        })
        .sum()
}
