//! Perfect clear search - pruned backtracking over placements, first ply
//! optionally fanned out across rayon workers.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::{SolverConfig, MAX_LINES};
use crate::error::SolveError;
use crate::prune::{is_dead_board, parity_constraint, ParityConstraint};
use pcfind_core::{Board, GameState, Piece, Placement};
use pcfind_engine::{apply_to_state, generate_moves_with_hold, StepResult};

/// Placements in play order.
pub type Solution = Vec<Placement>;

/// Pushes a placement on creation and pops it again on drop.
struct PathGuard<'a> {
    path: &'a mut Vec<Placement>,
}

impl<'a> PathGuard<'a> {
    fn push(path: &'a mut Vec<Placement>, placement: Placement) -> Self {
        path.push(placement);
        Self { path }
    }

    fn path(&mut self) -> &mut Vec<Placement> {
        &mut *self.path
    }
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.path.pop();
    }
}

/// Receives finished paths.
trait Sink {
    fn should_stop(&self) -> bool;
    fn record(&mut self, path: &[Placement]) -> ControlFlow<()>;
}

/// Existence query: keep the first path and tell every worker to stop.
struct FirstSolution<'a> {
    found: &'a AtomicBool,
    path: Option<Solution>,
}

impl Sink for FirstSolution<'_> {
    #[inline]
    fn should_stop(&self) -> bool {
        self.found.load(Ordering::Relaxed)
    }

    fn record(&mut self, path: &[Placement]) -> ControlFlow<()> {
        self.path = Some(path.to_vec());
        self.found.store(true, Ordering::Relaxed);
        ControlFlow::Break(())
    }
}

/// Enumeration query: collect everything.
#[derive(Default)]
struct AllSolutions {
    solutions: Vec<Solution>,
}

impl Sink for AllSolutions {
    #[inline]
    fn should_stop(&self) -> bool {
        false
    }

    fn record(&mut self, path: &[Placement]) -> ControlFlow<()> {
        self.solutions.push(path.to_vec());
        ControlFlow::Continue(())
    }
}

/// One search node: a game state plus queue bookkeeping.
#[derive(Clone, Copy, Debug)]
struct Node {
    state: GameState,
    /// Queue index of the first window slot.
    consumed: usize,
    cleared: usize,
}

/// Read-only context shared by every branch of one query.
struct Search<'q> {
    queue: &'q [Piece],
    max_lines: usize,
    parity_pruning: bool,
    board_pruning: bool,
}

impl Search<'_> {
    /// Active piece, hold slot, then everything not yet drawn.
    fn remaining_pieces(&self, node: &Node) -> Vec<Piece> {
        let rest = self.queue.get(node.consumed..).unwrap_or_default();
        let mut pieces = Vec::with_capacity(rest.len() + 2);
        pieces.extend(node.state.current);
        pieces.extend(node.state.hold);
        pieces.extend_from_slice(rest);
        pieces
    }

    fn parity(&self, node: &Node) -> ParityConstraint {
        if !self.parity_pruning {
            return ParityConstraint::UNCONSTRAINED;
        }
        let lines_left = self.max_lines - node.cleared;
        parity_constraint(&node.state.board, lines_left, &self.remaining_pieces(node))
    }

    /// Placements worth trying from `node`, in move generator order.
    fn candidates(&self, node: &Node) -> Vec<Placement> {
        let parity = self.parity(node);
        if !parity.feasible {
            return Vec::new();
        }
        let mut moves = generate_moves_with_hold(&node.state);
        moves.retain(|p| parity.allows(p));
        moves
    }

    fn search<S: Sink>(&self, node: &Node, path: &mut Vec<Placement>, sink: &mut S) -> ControlFlow<()> {
        if sink.should_stop() {
            return ControlFlow::Break(());
        }
        for placement in self.candidates(node) {
            self.step(node, placement, path, sink)?;
        }
        ControlFlow::Continue(())
    }

    fn step<S: Sink>(
        &self,
        node: &Node,
        placement: Placement,
        path: &mut Vec<Placement>,
        sink: &mut S,
    ) -> ControlFlow<()> {
        let lines_left = self.max_lines - node.cleared;
        if placement.top() >= lines_left as i8 {
            return ControlFlow::Continue(());
        }

        let StepResult {
            mut state,
            lines,
            first_hold,
        } = apply_to_state(&node.state, &placement);
        // a first hold always draws a real piece from the window
        debug_assert!(!first_hold || node.consumed < self.queue.len());
        let consumed = (node.consumed + 1 + first_hold as usize).min(self.queue.len());
        state.fill_queue(self.queue, consumed);
        let cleared = node.cleared + lines as usize;

        let mut guard = PathGuard::push(path, placement);
        if cleared == self.max_lines || state.board.is_empty() {
            return sink.record(guard.path());
        }
        // queue spent: a piece left in hold cannot be played
        if state.current.is_none() {
            return ControlFlow::Continue(());
        }
        if self.board_pruning && is_dead_board(&state.board, self.max_lines - cleared) {
            return ControlFlow::Continue(());
        }

        let child = Node {
            state,
            consumed,
            cleared,
        };
        self.search(&child, guard.path(), sink)
    }
}

/// Perfect clear solver.
#[derive(Clone, Debug, Default)]
pub struct PcSolver {
    config: SolverConfig,
}

impl PcSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn validate(&self, board: &Board, queue: &[Piece]) -> Result<(), SolveError> {
        let max_lines = self.config.max_lines;
        if queue.is_empty() {
            return Err(SolveError::EmptyQueue);
        }
        if !(1..=MAX_LINES).contains(&max_lines) {
            return Err(SolveError::LineTarget(max_lines));
        }
        if board.height() > max_lines {
            return Err(SolveError::BoardTooTall {
                height: board.height(),
                max_lines,
            });
        }
        let filled = board.filled_rows();
        if filled > 0 {
            return Err(SolveError::FilledRows(filled));
        }
        Ok(())
    }

    fn context<'q>(&self, queue: &'q [Piece]) -> Search<'q> {
        Search {
            queue,
            max_lines: self.config.max_lines,
            parity_pruning: self.config.parity_pruning,
            board_pruning: self.config.board_pruning,
        }
    }

    /// Root node and its candidates, or None when the board is already
    /// doomed.
    fn seed(&self, ctx: &Search<'_>, board: &Board) -> Option<(Node, Vec<Placement>)> {
        let root = Node {
            state: GameState::with_queue(*board, ctx.queue),
            consumed: 1,
            cleared: 0,
        };
        if ctx.board_pruning && is_dead_board(board, ctx.max_lines) {
            trace!("root board has an unreachable pocket or an uneven split");
            return None;
        }
        let candidates = ctx.candidates(&root);
        if candidates.is_empty() {
            trace!("no root candidates survive pruning");
            return None;
        }
        Some((root, candidates))
    }

    /// Existence query.
    pub fn can_pc(&self, board: &Board, queue: &[Piece]) -> Result<bool, SolveError> {
        Ok(self.find_pc(board, queue)?.is_some())
    }

    /// Existence query that also returns the first path found.
    pub fn find_pc(&self, board: &Board, queue: &[Piece]) -> Result<Option<Solution>, SolveError> {
        self.validate(board, queue)?;
        let start = Instant::now();
        let ctx = self.context(queue);
        let Some((root, candidates)) = self.seed(&ctx, board) else {
            return Ok(None);
        };
        debug!(
            queue = queue.len(),
            max_lines = ctx.max_lines,
            candidates = candidates.len(),
            "searching for a perfect clear"
        );

        let found = AtomicBool::new(false);
        let solution = if self.config.parallel {
            candidates
                .par_iter()
                .map(|&placement| {
                    let mut sink = FirstSolution {
                        found: &found,
                        path: None,
                    };
                    let mut path = Vec::with_capacity(queue.len());
                    let _ = ctx.step(&root, placement, &mut path, &mut sink);
                    sink.path
                })
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .next()
        } else {
            let mut sink = FirstSolution {
                found: &found,
                path: None,
            };
            let mut path = Vec::with_capacity(queue.len());
            for &placement in &candidates {
                if ctx.step(&root, placement, &mut path, &mut sink).is_break() {
                    break;
                }
            }
            sink.path
        };

        debug!(
            found = solution.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "existence query finished"
        );
        Ok(solution)
    }

    /// Enumeration query: every placement sequence that clears the board.
    pub fn solve_pcs(&self, board: &Board, queue: &[Piece]) -> Result<Vec<Solution>, SolveError> {
        self.validate(board, queue)?;
        let start = Instant::now();
        let ctx = self.context(queue);
        let Some((root, candidates)) = self.seed(&ctx, board) else {
            return Ok(Vec::new());
        };
        debug!(
            queue = queue.len(),
            max_lines = ctx.max_lines,
            candidates = candidates.len(),
            "enumerating perfect clears"
        );

        let solutions: Vec<Solution> = if self.config.parallel {
            candidates
                .par_iter()
                .map(|&placement| {
                    let mut sink = AllSolutions::default();
                    let mut path = Vec::with_capacity(queue.len());
                    let _ = ctx.step(&root, placement, &mut path, &mut sink);
                    sink.solutions
                })
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            let mut sink = AllSolutions::default();
            let mut path = Vec::with_capacity(queue.len());
            for &placement in &candidates {
                let _ = ctx.step(&root, placement, &mut path, &mut sink);
            }
            sink.solutions
        };

        debug!(
            solutions = solutions.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "enumeration finished"
        );
        Ok(solutions)
    }
}
