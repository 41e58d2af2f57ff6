//! board representation - column-major u32s for fast bitwise ops
//! heuristics work on a row bound `h`: the rows still in play for the clear

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{Piece, Placement};

/// Extract the bits of `value` selected by `mask` and pack them at the bottom.
#[inline]
fn pext32(value: u32, mut mask: u32) -> u32 {
    let mut out = 0u32;
    let mut bit = 0;
    while mask != 0 {
        let low = mask & mask.wrapping_neg();
        if value & low != 0 {
            out |= 1 << bit;
        }
        bit += 1;
        mask &= mask - 1;
    }
    out
}

#[inline(always)]
fn row_mask(h: usize) -> u32 {
    if h >= 32 {
        u32::MAX
    } else {
        (1u32 << h) - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("row {row} has {width} cells, expected {expected}", expected = Board::WIDTH)]
    RowWidth { row: usize, width: usize },
    #[error("board has {0} rows, at most {max} fit", max = Board::HEIGHT)]
    TooManyRows(usize),
    #[error("invalid cell '{cell}' in row {row}")]
    InvalidCell { row: usize, cell: char },
}

/// 10x32 board using column-major u32 bitfields.
/// Row 0 is bottom; only rows 0-19 are visible.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct Board {
    cols: [u32; 10],
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 32;
    pub const VISIBLE_HEIGHT: usize = 20;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(cols: [u32; 10]) -> Self {
        Self { cols }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> bool {
        (self.cols[x] >> y) & 1 == 1
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize) {
        self.cols[x] |= 1 << y;
    }

    #[inline(always)]
    pub fn unset(&mut self, x: usize, y: usize) {
        self.cols[x] &= !(1 << y);
    }

    /// Fill the four cells of a placement. The placement must be in bounds.
    pub fn set_piece(&mut self, placement: &Placement) {
        for (x, y) in placement.cells() {
            self.set(x as usize, y as usize);
        }
    }

    pub fn unset_piece(&mut self, placement: &Placement) {
        for (x, y) in placement.cells() {
            self.unset(x as usize, y as usize);
        }
    }

    /// Rows filled in every column, as a bitmask.
    #[inline]
    fn full_rows(&self) -> u32 {
        self.cols.iter().fold(u32::MAX, |acc, &c| acc & c)
    }

    /// Remove every full row, compacting the rows above downward.
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let full = self.full_rows();
        if full == 0 {
            return 0;
        }
        let keep = !full;
        for col in self.cols.iter_mut() {
            *col = pext32(*col, keep);
        }
        full.count_ones()
    }

    pub fn filled_rows(&self) -> u32 {
        self.full_rows().count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols.iter().all(|&c| c == 0)
    }

    pub fn filled_cells(&self) -> u32 {
        self.cols.iter().map(|c| c.count_ones()).sum()
    }

    /// Index of the highest filled row plus one, 0 for an empty board.
    pub fn height(&self) -> usize {
        let all = self.cols.iter().fold(0u32, |acc, &c| acc | c);
        32 - all.leading_zeros() as usize
    }

    #[inline]
    pub fn column(&self, x: usize) -> u32 {
        self.cols[x]
    }

    #[inline]
    pub fn columns(&self) -> &[u32; 10] {
        &self.cols
    }

    /// Row `y` as a 10-bit mask, bit `x` set for a filled cell.
    pub fn row(&self, y: usize) -> u16 {
        (0..Self::WIDTH).fold(0u16, |acc, x| acc | ((((self.cols[x] >> y) & 1) as u16) << x))
    }

    /// Empty cells among the bottom `h` rows.
    pub fn empty_cells(&self, h: usize) -> u32 {
        let mask = row_mask(h);
        self.cols
            .iter()
            .map(|&c| h as u32 - (c & mask).count_ones())
            .sum()
    }

    /// Columns whose bottom `h` rows are all filled.
    pub fn full(&self, h: usize) -> u32 {
        let mask = row_mask(h);
        self.cols
            .iter()
            .enumerate()
            .fold(0, |acc, (x, &c)| acc | (((c & mask) == mask) as u32) << x)
    }

    /// Columns holding at least one filled cell below `h`.
    pub fn not_empty(&self, h: usize) -> u32 {
        let mask = row_mask(h);
        self.cols
            .iter()
            .enumerate()
            .fold(0, |acc, (x, &c)| acc | ((c & mask != 0) as u32) << x)
    }

    /// Columns where every row below `h` is either filled or walled in by
    /// filled cells on both sides. The board edges count as filled.
    pub fn bounded(&self, h: usize) -> u32 {
        let mask = row_mask(h);
        let mut out = 0;
        for x in 0..Self::WIDTH {
            let left = if x == 0 { u32::MAX } else { self.cols[x - 1] };
            let right = if x == Self::WIDTH - 1 {
                u32::MAX
            } else {
                self.cols[x + 1]
            };
            if ((left & right) | self.cols[x]) & mask == mask {
                out |= 1 << x;
            }
        }
        out
    }

    /// A partially filled column whose gaps can only be reached from above
    /// by a single-column piece.
    #[inline]
    pub fn has_isolated_pocket(&self, h: usize) -> bool {
        self.not_empty(h) & !self.full(h) & self.bounded(h) != 0
    }

    /// A full interior column splits the board; the cells to its right must
    /// then be tileable on their own.
    pub fn has_imbalanced_split(&self, h: usize) -> bool {
        let full = self.full(h);
        let mask = row_mask(h);
        (1..Self::WIDTH - 1).any(|x| {
            (full >> x) & 1 == 1
                && self.cols[x + 1..]
                    .iter()
                    .map(|&c| h as u32 - (c & mask).count_ones())
                    .sum::<u32>()
                    % 4
                    != 0
        })
    }

    /// Filled cells in even and odd columns.
    pub fn column_colours(&self) -> (u32, u32) {
        self.cols
            .iter()
            .enumerate()
            .fold((0, 0), |(even, odd), (x, &c)| {
                if x % 2 == 0 {
                    (even + c.count_ones(), odd)
                } else {
                    (even, odd + c.count_ones())
                }
            })
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<u16> = (0..self.height()).map(|y| self.row(y)).collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<u16> = Vec::deserialize(deserializer)?;
        if rows.len() > Board::HEIGHT {
            return Err(serde::de::Error::custom(BoardParseError::TooManyRows(
                rows.len(),
            )));
        }
        let mut board = Board::new();
        for (y, &value) in rows.iter().enumerate() {
            if value >> Board::WIDTH != 0 {
                return Err(serde::de::Error::custom(format_args!(
                    "row {y} mask {value} sets bits past column {}",
                    Board::WIDTH - 1
                )));
            }
            for x in 0..Board::WIDTH {
                if (value >> x) & 1 == 1 {
                    board.set(x, y);
                }
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.height().max(Self::VISIBLE_HEIGHT);
        for y in (0..rows).rev() {
            for x in 0..Self::WIDTH {
                write!(f, "{}", if self.get(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Rows top first, separated by newlines, `|` or `/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .split(['\n', '|', '/'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        if rows.len() > Self::HEIGHT {
            return Err(BoardParseError::TooManyRows(rows.len()));
        }
        let mut board = Board::new();
        for (i, text) in rows.iter().enumerate() {
            let y = rows.len() - 1 - i;
            let width = text.chars().count();
            if width != Self::WIDTH {
                return Err(BoardParseError::RowWidth { row: i, width });
            }
            for (x, cell) in text.chars().enumerate() {
                match cell {
                    '.' | '_' => {}
                    '#' | 'X' | 'x' | 'G' | 'g' => board.set(x, y),
                    c if Piece::from_char(c).is_some() => board.set(x, y),
                    c => return Err(BoardParseError::InvalidCell { row: i, cell: c }),
                }
            }
        }
        Ok(board)
    }
}
