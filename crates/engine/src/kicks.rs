//! SRS kick tables for piece rotation.
//!
//! Kicks are derived from per-state offset tables: candidate `i` for a turn
//! `from -> to` is `offset[from][i] - offset[to][i]`. Shapes rotate about the
//! anchor, so these offsets also carry the true SRS rotation centre.

use pcfind_core::{Piece, Rotation};

/// Piece families sharing one offset table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KickGroup {
    Jlstz,
    O,
    I,
}

impl KickGroup {
    pub fn of(piece: Piece) -> Self {
        match piece {
            Piece::I => KickGroup::I,
            Piece::O => KickGroup::O,
            _ => KickGroup::Jlstz,
        }
    }

    /// Number of kick candidates per turn.
    pub const fn len(self) -> usize {
        match self {
            KickGroup::O => 1,
            _ => 5,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Offsets per group and rotation state, x right and y up.
const OFFSETS: [[[(i8, i8); 5]; 4]; 3] = [
    // JLSTZ
    [
        [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
    // O, only the first column is used
    [
        [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
        [(0, -1), (0, 0), (0, 0), (0, 0), (0, 0)],
        [(-1, -1), (0, 0), (0, 0), (0, 0), (0, 0)],
        [(-1, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
    ],
    // I
    [
        [(0, 0), (-1, 0), (2, 0), (-1, 0), (2, 0)],
        [(-1, 0), (0, 0), (0, 0), (0, 1), (0, -2)],
        [(-1, 1), (1, 1), (-2, 1), (1, 0), (-2, 0)],
        [(0, 1), (0, 1), (0, 1), (0, -1), (0, 2)],
    ],
];

/// Kick candidates for every group and every `from -> to` pair.
static KICKS: [[[[(i8, i8); 5]; 4]; 4]; 3] = {
    let mut table = [[[[(0i8, 0i8); 5]; 4]; 4]; 3];
    let mut group = 0;
    while group < 3 {
        let mut from = 0;
        while from < 4 {
            let mut to = 0;
            while to < 4 {
                let mut i = 0;
                while i < 5 {
                    let (fx, fy) = OFFSETS[group][from][i];
                    let (tx, ty) = OFFSETS[group][to][i];
                    table[group][from][to][i] = (fx - tx, fy - ty);
                    i += 1;
                }
                to += 1;
            }
            from += 1;
        }
        group += 1;
    }
    table
};

/// Get kick offsets for a rotation transition.
/// Returns the (dx, dy) candidates to try in order; empty unless the
/// transition is a quarter turn.
pub fn get_kicks(piece: Piece, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    if to != from.cw() && to != from.ccw() {
        return &[];
    }
    let group = KickGroup::of(piece);
    &KICKS[group.index()][from.index()][to.index()][..group.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jlstz_north_to_east() {
        let kicks = get_kicks(Piece::T, Rotation::North, Rotation::East);
        assert_eq!(kicks, &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]);
    }

    #[test]
    fn test_jlstz_east_to_north_mirrors() {
        let kicks = get_kicks(Piece::L, Rotation::East, Rotation::North);
        assert_eq!(kicks, &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_i_north_to_east() {
        let kicks = get_kicks(Piece::I, Rotation::North, Rotation::East);
        assert_eq!(kicks, &[(1, 0), (-1, 0), (2, 0), (-1, -1), (2, 2)]);
    }

    #[test]
    fn test_o_keeps_cells() {
        for from in Rotation::ALL {
            let to = from.cw();
            let kicks = get_kicks(Piece::O, from, to);
            assert_eq!(kicks.len(), 1);
            let (dx, dy) = kicks[0];
            let mut before = Piece::O.minos(from);
            let mut after = Piece::O.minos(to).map(|(x, y)| (x + dx, y + dy));
            before.sort();
            after.sort();
            assert_eq!(before, after, "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn test_no_half_turns() {
        assert!(get_kicks(Piece::T, Rotation::North, Rotation::South).is_empty());
        assert!(get_kicks(Piece::I, Rotation::East, Rotation::West).is_empty());
        assert!(get_kicks(Piece::T, Rotation::North, Rotation::North).is_empty());
    }
}
