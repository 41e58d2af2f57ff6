//! Piece types and mino definitions for Tetris pieces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum Piece {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a piece letter")]
pub struct PieceParseError(pub char);

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    pub fn cw(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn ccw(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// North shapes, indexed by `Piece as usize`.
const SPAWN_SHAPES: [[(i8, i8); 4]; 7] = [
    [(-1, 0), (0, 0), (1, 0), (2, 0)],  // I
    [(0, 0), (1, 0), (0, 1), (1, 1)],   // O
    [(-1, 0), (0, 0), (1, 0), (0, 1)],  // T
    [(-1, 0), (0, 0), (0, 1), (1, 1)],  // S
    [(-1, 1), (0, 1), (0, 0), (1, 0)],  // Z
    [(-1, 0), (0, 0), (1, 0), (-1, 1)], // J
    [(-1, 0), (0, 0), (1, 0), (1, 1)],  // L
];

/// Every piece in every rotation, built by turning the spawn shape about the
/// anchor. Position corrections live in the kick offset tables.
const MINOS: [[[(i8, i8); 4]; 4]; 7] = {
    let mut table = [[[(0i8, 0i8); 4]; 4]; 7];
    let mut piece = 0;
    while piece < 7 {
        let mut mino = 0;
        while mino < 4 {
            let (x, y) = SPAWN_SHAPES[piece][mino];
            table[piece][0][mino] = (x, y);
            table[piece][1][mino] = (y, -x);
            table[piece][2][mino] = (-x, -y);
            table[piece][3][mino] = (-y, x);
            mino += 1;
        }
        piece += 1;
    }
    table
};

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::O,
        Piece::T,
        Piece::S,
        Piece::Z,
        Piece::J,
        Piece::L,
    ];

    /// Get mino offsets for this piece at given rotation.
    /// Returns 4 (x, y) offsets relative to the anchor, y pointing up.
    #[inline(always)]
    pub fn minos(self, rot: Rotation) -> [(i8, i8); 4] {
        MINOS[self as usize][rot.index()]
    }

    /// Spawn column of the anchor
    pub fn spawn_x(self) -> i8 {
        4
    }

    /// Spawn row of the anchor
    pub fn spawn_y(self) -> i8 {
        18
    }

    pub fn from_char(c: char) -> Option<Piece> {
        match c.to_ascii_uppercase() {
            'I' => Some(Piece::I),
            'O' => Some(Piece::O),
            'T' => Some(Piece::T),
            'S' => Some(Piece::S),
            'Z' => Some(Piece::Z),
            'J' => Some(Piece::J),
            'L' => Some(Piece::L),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Piece::I => 'I',
            Piece::O => 'O',
            Piece::T => 'T',
            Piece::S => 'S',
            Piece::Z => 'Z',
            Piece::J => 'J',
            Piece::L => 'L',
        }
    }

    /// J and L cover three cells of one column colour in every orientation.
    pub fn is_corner(self) -> bool {
        matches!(self, Piece::J | Piece::L)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Piece::from_char(c).ok_or(PieceParseError(c)),
            (Some(c), Some(_)) => Err(PieceParseError(c)),
            (None, _) => Err(PieceParseError(' ')),
        }
    }
}
