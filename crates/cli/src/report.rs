use std::io::{self, Write};

use pcfind_core::Piece;
use pcfind_search::Solution;
use serde::Serialize;

/// Result for one concrete queue.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QueueReport {
    queue: String,
    solvable: bool,
    solutions: Vec<Solution>,
}

impl QueueReport {
    pub fn new(queue: &[Piece], solutions: Vec<Solution>) -> Self {
        Self {
            queue: queue.iter().map(|p| p.to_char()).collect(),
            solvable: !solutions.is_empty(),
            solutions,
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W, list: bool) -> io::Result<()> {
        if !self.solvable {
            return writeln!(out, "{}: no perfect clear", self.queue);
        }
        if !list {
            return writeln!(out, "{}: perfect clear", self.queue);
        }
        writeln!(out, "{}: {} solution(s)", self.queue, self.solutions.len())?;
        for solution in &self.solutions {
            let steps: Vec<String> = solution.iter().map(ToString::to_string).collect();
            writeln!(out, "  {}", steps.join(", "))?;
        }
        Ok(())
    }
}
