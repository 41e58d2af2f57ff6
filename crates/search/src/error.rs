use thiserror::Error;

use crate::config::MAX_LINES;

/// Inputs the solver refuses before searching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("queue is empty")]
    EmptyQueue,
    #[error("line target {0} is outside 1..={max}", max = MAX_LINES)]
    LineTarget(usize),
    #[error("board reaches row {height}, above the {max_lines}-line target")]
    BoardTooTall { height: usize, max_lines: usize },
    #[error("board already has {0} filled rows")]
    FilledRows(u32),
}
