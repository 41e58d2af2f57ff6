//! pcfind-engine - rotation, movement and move generation.
//!
//! Provides SRS kicks, collision, movement, BFS move generation and perft.

pub mod apply;
pub mod collision;
pub mod kicks;
pub mod movegen;
pub mod movement;
pub mod perft;

pub use apply::{apply_placement, apply_placement_mut, apply_to_state, StepResult};
pub use collision::{can_place, collides, hard_drop_y, placement_collides};
pub use kicks::{get_kicks, KickGroup};
pub use movegen::{current_piece_moves, generate_moves, generate_moves_with_hold, hold_piece_moves};
pub use movement::{
    process_movement, rotate, shift, sonic_drop, try_drop, try_move, try_rotate, Movement,
    RotationResult,
};
pub use perft::{perft, perft_parallel};
