//! Piece placement - a piece type at an anchor position and rotation.

use std::fmt;

use crate::{Piece, Rotation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub piece: Piece,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Placement {
    pub fn new(piece: Piece, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            piece,
            rotation,
            x,
            y,
        }
    }

    /// Spawn state of a freshly drawn piece.
    pub fn spawn(piece: Piece) -> Self {
        Self::new(piece, Rotation::North, piece.spawn_x(), piece.spawn_y())
    }

    /// Absolute board coordinates of the four minos.
    #[inline]
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.piece
            .minos(self.rotation)
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Highest row covered by this placement.
    pub fn top(&self) -> i8 {
        self.cells().iter().map(|&(_, y)| y).max().unwrap_or(self.y)
    }

    /// East and West stand the piece on its side.
    pub fn is_vertical(&self) -> bool {
        matches!(self.rotation, Rotation::East | Rotation::West)
    }

    /// Key identifying the occupied cells, independent of anchor and
    /// rotation. Two placements covering the same cells share a key.
    pub fn cell_key(&self) -> u64 {
        let mut idx = self
            .cells()
            .map(|(x, y)| ((y as i16 + 8) * 16 + (x as i16 + 8)) as u16);
        idx.sort_unstable();
        idx.iter().fold(0u64, |acc, &i| (acc << 16) | i as u64)
    }

    #[must_use]
    pub fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} ({},{})",
            self.piece, self.rotation, self.x, self.y
        )
    }
}
