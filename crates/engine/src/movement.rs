//! Rotation and movement logic with kick application.

use serde::{Deserialize, Serialize};

use crate::collision::{can_place, hard_drop_y};
use crate::kicks::get_kicks;
use pcfind_core::{Board, Piece, Placement, Rotation};

/// Result of a rotation attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationResult {
    pub new_rotation: Rotation,
    pub new_x: i8,
    pub new_y: i8,
    /// Index into the kick list of the candidate that fit.
    pub kick_index: usize,
}

/// A single input applied to a falling piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Left,
    Right,
    RotateCw,
    RotateCcw,
    SoftDrop,
    SonicDrop,
}

impl Movement {
    pub const ALL: [Movement; 6] = [
        Movement::Left,
        Movement::Right,
        Movement::RotateCw,
        Movement::RotateCcw,
        Movement::SoftDrop,
        Movement::SonicDrop,
    ];
}

/// Try to rotate a piece a quarter turn, applying kicks if necessary.
/// Returns None if every kick candidate collides.
pub fn try_rotate(
    board: &Board,
    piece: Piece,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
) -> Option<RotationResult> {
    let new_rotation = if clockwise {
        rotation.cw()
    } else {
        rotation.ccw()
    };

    get_kicks(piece, rotation, new_rotation)
        .iter()
        .enumerate()
        .find_map(|(i, &(dx, dy))| {
            let nx = x + dx;
            let ny = y + dy;
            can_place(board, piece, new_rotation, nx, ny).then_some(RotationResult {
                new_rotation,
                new_x: nx,
                new_y: ny,
                kick_index: i,
            })
        })
}

/// Try to move piece horizontally
pub fn try_move(
    board: &Board,
    piece: Piece,
    rotation: Rotation,
    x: i8,
    y: i8,
    dx: i8,
) -> Option<i8> {
    let new_x = x + dx;
    if can_place(board, piece, rotation, new_x, y) {
        Some(new_x)
    } else {
        None
    }
}

/// Try to move piece down (soft drop)
pub fn try_drop(board: &Board, piece: Piece, rotation: Rotation, x: i8, y: i8) -> Option<i8> {
    let new_y = y - 1;
    if can_place(board, piece, rotation, x, new_y) {
        Some(new_y)
    } else {
        None
    }
}

/// Shift one column; false leaves the placement untouched.
pub fn shift(board: &Board, placement: &mut Placement, dx: i8) -> bool {
    match try_move(
        board,
        placement.piece,
        placement.rotation,
        placement.x,
        placement.y,
        dx,
    ) {
        Some(x) => {
            placement.x = x;
            true
        }
        None => false,
    }
}

/// Quarter turn with kicks; false leaves the placement untouched.
pub fn rotate(board: &Board, placement: &mut Placement, clockwise: bool) -> bool {
    match try_rotate(
        board,
        placement.piece,
        placement.rotation,
        placement.x,
        placement.y,
        clockwise,
    ) {
        Some(r) => {
            placement.rotation = r.new_rotation;
            placement.x = r.new_x;
            placement.y = r.new_y;
            true
        }
        None => false,
    }
}

/// Drop until resting. Returns whether the piece moved.
pub fn sonic_drop(board: &Board, placement: &mut Placement) -> bool {
    let y = hard_drop_y(
        board,
        placement.piece,
        placement.rotation,
        placement.x,
        placement.y,
    );
    let moved = y != placement.y;
    placement.y = y;
    moved
}

/// Apply one movement and report whether the placement changed.
pub fn process_movement(board: &Board, placement: &mut Placement, movement: Movement) -> bool {
    match movement {
        Movement::Left => shift(board, placement, -1),
        Movement::Right => shift(board, placement, 1),
        Movement::RotateCw => rotate(board, placement, true),
        Movement::RotateCcw => rotate(board, placement, false),
        Movement::SoftDrop => match try_drop(
            board,
            placement.piece,
            placement.rotation,
            placement.x,
            placement.y,
        ) {
            Some(y) => {
                placement.y = y;
                true
            }
            None => false,
        },
        Movement::SonicDrop => sonic_drop(board, placement),
    }
}
