//! Game state representation - board, active piece, hold slot and lookahead window.

use crate::{Board, Piece, Placement};
use serde::{Deserialize, Serialize};

/// Lookahead window capacity.
pub const QUEUE_SIZE: usize = 6;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current: Option<Piece>,
    pub hold: Option<Piece>,
    /// Upcoming pieces, vacant slots past the end of the queue.
    pub queue: [Option<Piece>; QUEUE_SIZE],
}

impl GameState {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    /// Seed a state from the head of `queue`: the first piece becomes
    /// active and the window holds the following pieces.
    pub fn with_queue(board: Board, queue: &[Piece]) -> Self {
        let mut state = Self::new(board);
        state.current = queue.first().copied();
        state.fill_queue(queue, 1);
        state
    }

    /// Refill the window from `queue[consumed..]`.
    pub fn fill_queue(&mut self, queue: &[Piece], consumed: usize) {
        for (i, slot) in self.queue.iter_mut().enumerate() {
            *slot = queue.get(consumed + i).copied();
        }
    }

    /// Shift the window down one slot and return what fell off the front.
    fn advance(&mut self) -> Option<Piece> {
        let front = self.queue[0];
        self.queue.copy_within(1.., 0);
        self.queue[QUEUE_SIZE - 1] = None;
        front
    }

    /// Lock `placement` onto the board and draw the next piece.
    ///
    /// A placement of a piece other than the active one uses the hold slot.
    /// Returns true when that was the first hold, which drew one extra piece
    /// from the queue to fill the empty slot.
    pub fn place_piece(&mut self, placement: &Placement) -> bool {
        let mut first_hold = false;
        if Some(placement.piece) != self.current {
            if self.hold.is_none() {
                // the slot was empty: the next piece comes out of the window
                self.hold = self.advance();
                first_hold = true;
            }
            std::mem::swap(&mut self.hold, &mut self.current);
        }
        debug_assert_eq!(Some(placement.piece), self.current);
        self.board.set_piece(placement);
        self.current = self.advance();
        first_hold
    }

    /// Swap the active piece with the hold slot. An empty hold slot draws from
    /// the window instead. Returns false when there is nothing to swap in.
    pub fn do_hold(&mut self) -> bool {
        match self.hold {
            Some(_) => {
                std::mem::swap(&mut self.hold, &mut self.current);
                true
            }
            None if self.queue[0].is_some() => {
                self.hold = self.current;
                self.current = self.advance();
                true
            }
            None => false,
        }
    }

    /// Piece that becomes active when holding, if that differs from the
    /// current piece.
    pub fn hold_candidate(&self) -> Option<Piece> {
        self.hold
            .or(self.queue[0])
            .filter(|&p| Some(p) != self.current)
    }

    /// Pieces still available to this state: active, held, then the window.
    pub fn visible_pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        [self.current, self.hold]
            .into_iter()
            .chain(self.queue)
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rotation;

    fn flat(piece: Piece) -> Placement {
        Placement::new(piece, Rotation::North, 1, 0)
    }

    #[test]
    fn test_default_state() {
        let s = GameState::default();
        assert!(s.current.is_none());
        assert!(s.hold.is_none());
        assert!(s.queue.iter().all(Option::is_none));
        assert_eq!(s.hold_candidate(), None);
    }

    #[test]
    fn test_with_queue() {
        let s = GameState::with_queue(Board::new(), &[Piece::T, Piece::I, Piece::O]);
        assert_eq!(s.current, Some(Piece::T));
        assert_eq!(s.queue[0], Some(Piece::I));
        assert_eq!(s.queue[1], Some(Piece::O));
        assert_eq!(s.queue[2], None);
    }

    #[test]
    fn test_place_current_advances_window() {
        let mut s = GameState::with_queue(Board::new(), &[Piece::T, Piece::I, Piece::O]);
        assert!(!s.place_piece(&flat(Piece::T)));
        assert_eq!(s.current, Some(Piece::I));
        assert_eq!(s.queue[0], Some(Piece::O));
        assert_eq!(s.hold, None);
        assert_eq!(s.board.filled_cells(), 4);
    }

    #[test]
    fn test_first_hold_consumes_extra_piece() {
        let mut s = GameState::with_queue(Board::new(), &[Piece::T, Piece::I, Piece::O]);
        assert_eq!(s.hold_candidate(), Some(Piece::I));
        assert!(s.place_piece(&flat(Piece::I)));
        assert_eq!(s.hold, Some(Piece::T));
        assert_eq!(s.current, Some(Piece::O));
        assert_eq!(s.queue[0], None);

        // later holds just swap
        assert_eq!(s.hold_candidate(), Some(Piece::T));
        assert!(!s.place_piece(&flat(Piece::T)));
        assert_eq!(s.hold, Some(Piece::O));
        assert_eq!(s.current, None);
    }

    #[test]
    fn test_hold_swap_with_empty_active_slot() {
        let mut s = GameState::with_queue(Board::new(), &[Piece::T]);
        s.hold = Some(Piece::I);
        s.place_piece(&flat(Piece::T));
        assert_eq!(s.current, None);
        assert_eq!(s.hold_candidate(), Some(Piece::I));
        s.place_piece(&flat(Piece::I).shifted(0, 2));
        assert_eq!(s.current, None);
        assert_eq!(s.hold, None);
    }

    #[test]
    fn test_same_piece_hold_is_skipped() {
        let s = GameState::with_queue(Board::new(), &[Piece::T, Piece::T, Piece::O]);
        assert_eq!(s.hold_candidate(), None);
    }

    #[test]
    fn test_do_hold() {
        let mut s = GameState::with_queue(Board::new(), &[Piece::T, Piece::I]);
        assert!(s.do_hold());
        assert_eq!(s.current, Some(Piece::I));
        assert_eq!(s.hold, Some(Piece::T));
        assert!(s.do_hold());
        assert_eq!(s.current, Some(Piece::T));
        assert_eq!(s.hold, Some(Piece::I));

        let mut empty = GameState::with_queue(Board::new(), &[Piece::T]);
        assert!(!empty.do_hold());
        assert_eq!(empty.current, Some(Piece::T));
    }

    #[test]
    fn test_fill_queue_offsets() {
        let queue = [Piece::T, Piece::I, Piece::O, Piece::S];
        let mut s = GameState::new(Board::new());
        s.fill_queue(&queue, 2);
        assert_eq!(s.queue[0], Some(Piece::O));
        assert_eq!(s.queue[1], Some(Piece::S));
        assert_eq!(s.queue[2], None);
        assert_eq!(s.visible_pieces().count(), 2);
    }
}
