//! Fumen v115 decoding - the field of the first page becomes a `Board`.
//!
//! A field is 24 rows of 10 cells, top row first, with a garbage row last.
//! Cells are run-length encoded as pairs of base64 digits; each run stores
//! a colour delta (offset by 8) and a repeat count.

use thiserror::Error;

use crate::Board;

const PREFIX: &str = "v115@";
const FIELD_ROWS: usize = 23;
const FIELD_CELLS: usize = (FIELD_ROWS + 1) * Board::WIDTH;
/// Delta meaning "cell unchanged".
const NO_CHANGE: usize = 8;
const MAX_COLOUR: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FumenError {
    #[error("fumen must start with '{prefix}'", prefix = PREFIX)]
    MissingPrefix,
    #[error("invalid fumen character '{ch}' at {pos}")]
    InvalidChar { ch: char, pos: usize },
    #[error("fumen data ends early")]
    Truncated,
    #[error("field run overflows the {cells}-cell field", cells = FIELD_CELLS)]
    FieldOverflow,
    #[error("cell colour {0} is out of range")]
    InvalidColour(usize),
}

fn base64_value(c: char) -> Option<usize> {
    let v = match c {
        'A'..='Z' => c as u32 - 'A' as u32,
        'a'..='z' => c as u32 - 'a' as u32 + 26,
        '0'..='9' => c as u32 - '0' as u32 + 52,
        '+' => 62,
        '/' => 63,
        _ => return None,
    };
    Some(v as usize)
}

/// Reads little-endian base64 numbers off the data string.
struct Digits<'a> {
    chars: std::iter::Enumerate<std::str::Chars<'a>>,
}

impl<'a> Digits<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            chars: data.chars().enumerate(),
        }
    }

    fn digit(&mut self) -> Result<usize, FumenError> {
        loop {
            let (pos, ch) = self.chars.next().ok_or(FumenError::Truncated)?;
            if ch == '?' {
                continue;
            }
            return base64_value(ch).ok_or(FumenError::InvalidChar {
                ch,
                pos: pos + PREFIX.len(),
            });
        }
    }

    fn number(&mut self, width: u32) -> Result<usize, FumenError> {
        let mut value = 0;
        for i in 0..width {
            value += self.digit()? * 64usize.pow(i);
        }
        Ok(value)
    }
}

impl Board {
    /// Decode the field of the first page of a v115 fumen. Piece, flag and
    /// comment data are checked for presence but not interpreted; the
    /// garbage row is ignored.
    pub fn from_fumen(fumen: &str) -> Result<Self, FumenError> {
        let data = fumen
            .trim()
            .strip_prefix(PREFIX)
            .ok_or(FumenError::MissingPrefix)?;
        let mut digits = Digits::new(data);

        let mut deltas = [NO_CHANGE; FIELD_CELLS];
        let mut filled = 0;
        while filled < FIELD_CELLS {
            let number = digits.number(2)?;
            let delta = number / 240;
            let repeats = number % 240 + 1;
            if filled + repeats > FIELD_CELLS {
                return Err(FumenError::FieldOverflow);
            }
            deltas[filled..filled + repeats].fill(delta);
            filled += repeats;
        }
        if deltas.iter().all(|&d| d == NO_CHANGE) {
            // count of following pages that reuse this field
            digits.digit()?;
        }
        // piece, rotation, position and flags of the page
        digits.number(3)?;

        let mut board = Board::new();
        for (i, &delta) in deltas[..FIELD_ROWS * Board::WIDTH].iter().enumerate() {
            // the first page starts from an empty field
            let colour = delta
                .checked_sub(NO_CHANGE)
                .filter(|&c| c <= MAX_COLOUR)
                .ok_or(FumenError::InvalidColour(delta))?;
            if colour != 0 {
                let y = FIELD_ROWS - 1 - i / Board::WIDTH;
                board.set(i % Board::WIDTH, y);
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field() {
        let board = Board::from_fumen("v115@vhAAgH").unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_gray_cells() {
        // two gray cells on top of four
        let board = Board::from_fumen("v115@RhB8HeD8PeAgH").unwrap();
        let expected: Board = "##........|####......".parse().unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_coloured_cells() {
        // I-coloured cells on the left, Z-coloured on the right
        let board = Board::from_fumen("v115@bhyhCeDtJeAgH").unwrap();
        let expected: Board = "###...####".parse().unwrap();
        assert_eq!(board, expected);
        assert_eq!(board.filled_cells(), 7);
    }

    #[test]
    fn test_question_marks_are_skipped() {
        let board = Board::from_fumen("v115@RhB8HeD8?PeAgH").unwrap();
        assert_eq!(board.filled_cells(), 6);
    }

    #[test]
    fn test_errors() {
        assert_eq!(Board::from_fumen("vhAAgH"), Err(FumenError::MissingPrefix));
        assert_eq!(Board::from_fumen("v115@vh"), Err(FumenError::Truncated));
        assert_eq!(Board::from_fumen("v115@vhAAg"), Err(FumenError::Truncated));
        assert_eq!(
            Board::from_fumen("v115@v!AAgH"),
            Err(FumenError::InvalidChar { ch: '!', pos: 6 })
        );
        // a 239-cell run followed by a 2-cell run
        assert_eq!(Board::from_fumen("v115@uhBe"), Err(FumenError::FieldOverflow));
    }

    #[test]
    fn test_negative_colour() {
        // delta 0 across the whole empty field
        assert_eq!(
            Board::from_fumen("v115@vDAgH"),
            Err(FumenError::InvalidColour(0))
        );
    }
}
