//! Legal move generation for a given game state.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::collision::{can_place, hard_drop_y};
use crate::movement::{try_drop, try_move, try_rotate};
use pcfind_core::{Board, GameState, Piece, Placement, Rotation};

const VISIT_W: usize = Board::WIDTH + 4;
const VISIT_H: usize = Board::HEIGHT + 4;

type Visited = [[[bool; VISIT_H]; VISIT_W]; 4];

/// Generate all locked placements for a piece on the board.
///
/// BFS over (x, y, rotation) from the spawn state using shifts, quarter
/// turns and one-row drops. Every reached state contributes its sonic-drop
/// position. Placements covering the same cells are reported once, first
/// discovery wins, and the output keeps discovery order.
pub fn generate_moves(board: &Board, piece: Piece) -> Vec<Placement> {
    let mut moves = Vec::new();
    let spawn = Placement::spawn(piece);

    if !can_place(board, piece, spawn.rotation, spawn.x, spawn.y) {
        return moves;
    }

    let mut visited: Visited = [[[false; VISIT_H]; VISIT_W]; 4];
    let mut seen_cells = FxHashSet::default();
    let mut queue = VecDeque::new();
    visit_state(&mut visited, &mut queue, spawn.rotation, spawn.x, spawn.y);

    while let Some(state) = queue.pop_front() {
        let drop_y = hard_drop_y(board, piece, state.rotation, state.x, state.y);
        let locked = Placement::new(piece, state.rotation, state.x, drop_y);
        if seen_cells.insert(locked.cell_key()) {
            moves.push(locked);
        }

        if let Some(nx) = try_move(board, piece, state.rotation, state.x, state.y, -1) {
            visit_state(&mut visited, &mut queue, state.rotation, nx, state.y);
        }
        if let Some(nx) = try_move(board, piece, state.rotation, state.x, state.y, 1) {
            visit_state(&mut visited, &mut queue, state.rotation, nx, state.y);
        }
        if let Some(result) = try_rotate(board, piece, state.rotation, state.x, state.y, true) {
            visit_state(
                &mut visited,
                &mut queue,
                result.new_rotation,
                result.new_x,
                result.new_y,
            );
        }
        if let Some(result) = try_rotate(board, piece, state.rotation, state.x, state.y, false) {
            visit_state(
                &mut visited,
                &mut queue,
                result.new_rotation,
                result.new_x,
                result.new_y,
            );
        }
        if let Some(ny) = try_drop(board, piece, state.rotation, state.x, state.y) {
            visit_state(&mut visited, &mut queue, state.rotation, state.x, ny);
        }
    }

    moves
}

#[derive(Clone, Copy, Debug)]
struct MoveState {
    rotation: Rotation,
    x: i8,
    y: i8,
}

fn visit_state(
    visited: &mut Visited,
    queue: &mut VecDeque<MoveState>,
    rotation: Rotation,
    x: i8,
    y: i8,
) {
    let xi = x as isize + 2;
    let yi = y as isize + 2;
    if xi < 0 || xi >= VISIT_W as isize || yi < 0 || yi >= VISIT_H as isize {
        return;
    }
    let slot = &mut visited[rotation.index()][xi as usize][yi as usize];
    if !*slot {
        *slot = true;
        queue.push_back(MoveState { rotation, x, y });
    }
}

/// Placements for the active piece. Empty when there is none.
pub fn current_piece_moves(state: &GameState) -> Vec<Placement> {
    state
        .current
        .map(|piece| generate_moves(&state.board, piece))
        .unwrap_or_default()
}

/// Placements for the piece holding would bring in. Empty when holding
/// would not change the piece.
pub fn hold_piece_moves(state: &GameState) -> Vec<Placement> {
    state
        .hold_candidate()
        .map(|piece| generate_moves(&state.board, piece))
        .unwrap_or_default()
}

/// Generate moves including the hold option: active piece first, then the
/// hold alternative.
pub fn generate_moves_with_hold(state: &GameState) -> Vec<Placement> {
    let mut moves = current_piece_moves(state);
    moves.extend(hold_piece_moves(state));
    moves
}
