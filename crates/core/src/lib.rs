//! pcfind core crate - fundamental types for perfect clear search.

mod board;
mod fumen;
mod piece;
mod placement;
mod queue;
mod state;

pub use board::{Board, BoardParseError};
pub use fumen::FumenError;
pub use piece::{Piece, PieceParseError, Rotation};
pub use placement::Placement;
pub use queue::{expand_queue, QueueParseError, MAX_QUEUES};
pub use state::{GameState, QUEUE_SIZE};
