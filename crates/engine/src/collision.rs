//! collision detection - walls, floor, other blocks

use pcfind_core::{Board, Piece, Placement, Rotation};

/// does piece collide with anything?
/// Out of bounds counts as a collision; the floor sits below row 0.
#[inline(always)]
pub fn collides(board: &Board, piece: Piece, rotation: Rotation, x: i8, y: i8) -> bool {
    piece.minos(rotation).iter().any(|&(dx, dy)| {
        let cx = x + dx;
        let cy = y + dy;
        cx < 0
            || cy < 0
            || cx >= Board::WIDTH as i8
            || cy >= Board::HEIGHT as i8
            || board.get(cx as usize, cy as usize)
    })
}

/// can we place here? (just !collides)
#[inline(always)]
pub fn can_place(board: &Board, piece: Piece, rotation: Rotation, x: i8, y: i8) -> bool {
    !collides(board, piece, rotation, x, y)
}

#[inline]
pub fn placement_collides(board: &Board, placement: &Placement) -> bool {
    collides(
        board,
        placement.piece,
        placement.rotation,
        placement.x,
        placement.y,
    )
}

#[inline]
pub fn hard_drop_y(board: &Board, piece: Piece, rotation: Rotation, x: i8, y: i8) -> i8 {
    let mut landing_y = y;
    while !collides(board, piece, rotation, x, landing_y - 1) {
        landing_y -= 1;
    }
    landing_y
}
