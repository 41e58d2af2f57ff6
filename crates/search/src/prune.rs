//! Pruning rules - board shapes no piece sequence can clear, and the
//! columnar parity check.
//!
//! Colour the columns alternately. J, L and a vertical T always cover three
//! cells of one colour and one of the other; every other piece covers two
//! and two, or four of one colour. A clear leaves both colours balanced, so
//! the number of odd pieces still to be played has a fixed parity.

use pcfind_core::{Board, Piece, Placement};

/// Isolated pocket or imbalanced split below `lines_left`.
pub fn is_dead_board(board: &Board, lines_left: usize) -> bool {
    board.has_isolated_pocket(lines_left) || board.has_imbalanced_split(lines_left)
}

/// What the parity check allows at one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParityConstraint {
    /// Some way of finishing is parity consistent.
    pub feasible: bool,
    pub vertical_t: bool,
    pub horizontal_t: bool,
}

impl ParityConstraint {
    pub const UNCONSTRAINED: Self = Self {
        feasible: true,
        vertical_t: true,
        horizontal_t: true,
    };

    const IMPOSSIBLE: Self = Self {
        feasible: false,
        vertical_t: false,
        horizontal_t: false,
    };

    /// Filter for candidate placements. Only T placements are restricted.
    #[inline]
    pub fn allows(&self, placement: &Placement) -> bool {
        if placement.piece != Piece::T {
            return true;
        }
        if placement.is_vertical() {
            self.vertical_t
        } else {
            self.horizontal_t
        }
    }

    fn is_unconstrained(&self) -> bool {
        *self == Self::UNCONSTRAINED
    }

    /// Fold in one multiset of pieces that could be played to finish.
    fn admit(&mut self, odd: usize, t: usize, target: usize) {
        if t >= 1 || odd % 2 == target {
            self.feasible = true;
        }
        if t >= 1 {
            // the T placed now is one of the `t`, the rest stay free
            if t >= 2 || (odd + 1) % 2 == target {
                self.vertical_t = true;
            }
            if t >= 2 || odd % 2 == target {
                self.horizontal_t = true;
            }
        }
    }
}

/// Parity check for a board with `lines_left` rows in play.
///
/// `pieces` lists what is still playable in order: active piece, hold slot,
/// then the rest of the queue. For every clear height whose cell count fits
/// whole pieces, `n` pieces are played out of the first `n + 1`, one of them
/// possibly ending in hold. A scenario is consistent when a T can absorb the
/// parity or the J/L count already matches it.
pub fn parity_constraint(board: &Board, lines_left: usize, pieces: &[Piece]) -> ParityConstraint {
    let (white, black) = board.column_colours();
    let filled = (white + black) as usize;
    let target = ((white as i64 - black as i64) / 2).rem_euclid(2) as usize;

    let mut out = ParityConstraint::IMPOSSIBLE;
    for k in board.height().max(1)..=lines_left {
        let cells = k * Board::WIDTH;
        if cells <= filled || (cells - filled) % 4 != 0 {
            continue;
        }
        let n = (cells - filled) / 4;
        if pieces.len() < n {
            continue;
        }

        let window = &pieces[..pieces.len().min(n + 1)];
        let odd = window.iter().filter(|p| p.is_corner()).count();
        let t = window.iter().filter(|&&p| p == Piece::T).count();

        if window.len() == n {
            out.admit(odd, t, target);
        } else {
            // one piece of the window is left over
            if odd > 0 {
                out.admit(odd - 1, t, target);
            }
            if t > 0 {
                out.admit(odd, t - 1, target);
            }
            if odd + t < window.len() {
                out.admit(odd, t, target);
            }
        }

        if out.is_unconstrained() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcfind_core::Rotation;
    use Piece::*;

    #[test]
    fn test_dead_board_pocket() {
        let board: Board = "....#.....|####.#####".parse().unwrap();
        assert!(is_dead_board(&board, 2));
        assert!(!is_dead_board(&board, 4));
    }

    #[test]
    fn test_dead_board_split() {
        // column 2 full, 7 * 2 - 1 cells to its right
        let board: Board = "..#.......|..#......#".parse().unwrap();
        assert!(is_dead_board(&board, 2));
    }

    #[test]
    fn test_balanced_board_without_t() {
        let board = Board::new();
        let c = parity_constraint(&board, 2, &[I, O, S, Z, O, I]);
        assert!(c.feasible);
        let c = parity_constraint(&board, 2, &[I, O, S, Z, J, I]);
        // J can be the piece left over
        assert!(c.feasible);
        let c = parity_constraint(&board, 2, &[J, O, S, Z, O]);
        assert!(!c.feasible);
    }

    #[test]
    fn test_jl_pair_balances() {
        let board = Board::new();
        let c = parity_constraint(&board, 2, &[J, L, O, I, I]);
        assert!(c.feasible);
        assert!(!c.vertical_t && !c.horizontal_t);
    }

    #[test]
    fn test_single_t_orientation() {
        let board = Board::new();
        // one J among five pieces with nothing left over: T must stand up
        let c = parity_constraint(&board, 2, &[T, J, O, O, I]);
        assert!(c.feasible);
        assert!(c.vertical_t);
        assert!(!c.horizontal_t);

        let vertical = Placement::new(T, Rotation::East, 0, 1);
        let flat = Placement::new(T, Rotation::North, 1, 0);
        assert!(c.allows(&vertical));
        assert!(!c.allows(&flat));
        assert!(c.allows(&Placement::new(J, Rotation::North, 1, 0)));
    }

    #[test]
    fn test_two_t_unconstrained() {
        let board = Board::new();
        let c = parity_constraint(&board, 2, &[T, T, O, O, I]);
        assert_eq!(c, ParityConstraint::UNCONSTRAINED);
    }

    #[test]
    fn test_board_imbalance_sets_target() {
        // two white cells ahead: exactly one odd piece must be played
        let board: Board = "#.#.......".parse().unwrap();
        assert!(!parity_constraint(&board, 2, &[I, O, S]).feasible);
        assert!(parity_constraint(&board, 2, &[J, O, S]).feasible);

        // four white cells ahead: even, a vertical I can even it out
        let board: Board = "#.........|#.........|#.........|#.........".parse().unwrap();
        let c = parity_constraint(&board, 4, &[I, O, S, Z, I, O, S, Z, I]);
        assert!(c.feasible);
    }

    #[test]
    fn test_no_clear_height_fits() {
        // 17 cells to fill at two lines
        let board: Board = "#.#.......|#.........".parse().unwrap();
        assert!(!parity_constraint(&board, 2, &[I, O, S, Z, I]).feasible);
    }

    #[test]
    fn test_too_few_pieces() {
        let board = Board::new();
        let c = parity_constraint(&board, 2, &[T, T, T]);
        assert!(!c.feasible);
    }
}
