//! pcfind-search - perfect clear search with pruning.

mod config;
mod error;
pub mod prune;
mod solver;

pub use config::{SolverConfig, MAX_LINES};
pub use error::SolveError;
pub use prune::{is_dead_board, parity_constraint, ParityConstraint};
pub use solver::{PcSolver, Solution};

use pcfind_core::{Board, Piece};
use tracing::warn;

/// Existence query with the default configuration. Rejected inputs count as
/// unsolvable.
pub fn can_pc(board: &Board, queue: &[Piece]) -> bool {
    PcSolver::default()
        .can_pc(board, queue)
        .unwrap_or_else(|err| {
            warn!(%err, "can_pc rejected its input");
            false
        })
}

/// Enumeration query with the default configuration. Rejected inputs yield
/// no solutions.
pub fn solve_pcs(board: &Board, queue: &[Piece]) -> Vec<Solution> {
    PcSolver::default()
        .solve_pcs(board, queue)
        .unwrap_or_else(|err| {
            warn!(%err, "solve_pcs rejected its input");
            Vec::new()
        })
}
