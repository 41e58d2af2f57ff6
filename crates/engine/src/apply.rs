use pcfind_core::{Board, GameState, Placement};

/// Apply a placement to a board and return the resulting board and lines cleared.
pub fn apply_placement(board: &Board, placement: &Placement) -> (Board, u32) {
    let mut next = *board;
    let lines = apply_placement_mut(&mut next, placement);
    (next, lines)
}

/// Apply in place, returns lines cleared.
#[inline]
pub fn apply_placement_mut(board: &mut Board, placement: &Placement) -> u32 {
    // movegen guarantees the cells are in bounds and empty
    board.set_piece(placement);
    board.clear_lines()
}

/// Outcome of playing one placement on a game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepResult {
    pub state: GameState,
    pub lines: u32,
    /// The placement used the hold slot for the first time.
    pub first_hold: bool,
}

/// Play a placement on a copy of `state`: lock, draw, clear lines.
pub fn apply_to_state(state: &GameState, placement: &Placement) -> StepResult {
    let mut next = *state;
    let first_hold = next.place_piece(placement);
    let lines = next.board.clear_lines();
    StepResult {
        state: next,
        lines,
        first_hold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcfind_core::{Piece, Rotation};

    #[test]
    fn test_apply_t_piece_empty() {
        let board = Board::new();
        let p = Placement::new(Piece::T, Rotation::North, 4, 0);
        let (next, lines) = apply_placement(&board, &p);

        assert_eq!(lines, 0);
        // T North at (4,0): (3,0), (4,0), (5,0), (4,1)
        assert!(next.get(3, 0));
        assert!(next.get(4, 0));
        assert!(next.get(5, 0));
        assert!(next.get(4, 1));
        assert_eq!(next.filled_cells(), 4);
    }

    #[test]
    fn test_apply_i_piece_line_clear() {
        let mut board = Board::new();
        // fill row 0 except for columns 4..=7
        for x in 0..10 {
            if !(4..=7).contains(&x) {
                board.set(x, 0);
            }
        }

        // I North at (5, 0) covers (4,0), (5,0), (6,0), (7,0)
        let p = Placement::new(Piece::I, Rotation::North, 5, 0);
        let (next, lines) = apply_placement(&board, &p);

        assert_eq!(lines, 1);
        assert!(next.is_empty());
    }

    #[test]
    fn test_apply_to_state_with_hold() {
        let state = GameState::with_queue(Board::new(), &[Piece::T, Piece::I, Piece::O]);
        let p = Placement::new(Piece::I, Rotation::North, 5, 0);
        let step = apply_to_state(&state, &p);
        assert!(step.first_hold);
        assert_eq!(step.lines, 0);
        assert_eq!(step.state.hold, Some(Piece::T));
        assert_eq!(step.state.current, Some(Piece::O));
        // the source state is untouched
        assert_eq!(state.current, Some(Piece::T));
    }
}
