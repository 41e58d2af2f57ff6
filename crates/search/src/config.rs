use serde::{Deserialize, Serialize};

/// Largest line target the pocket rule stays sound for.
pub const MAX_LINES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Rows that must be cleared for a perfect clear.
    pub max_lines: usize,
    /// Fan the first ply out across rayon workers.
    pub parallel: bool,
    /// Columnar parity check and T orientation filter.
    pub parity_pruning: bool,
    /// Isolated-pocket and imbalanced-split rules.
    pub board_pruning: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_lines: MAX_LINES,
            parallel: true,
            parity_pruning: true,
            board_pruning: true,
        }
    }
}

impl SolverConfig {
    /// Plain search without any pruning, on the calling thread.
    pub fn brute_force() -> Self {
        Self {
            parallel: false,
            parity_pruning: false,
            board_pruning: false,
            ..Self::default()
        }
    }

    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_parity_pruning(mut self, enabled: bool) -> Self {
        self.parity_pruning = enabled;
        self
    }

    #[must_use]
    pub fn with_board_pruning(mut self, enabled: bool) -> Self {
        self.board_pruning = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = SolverConfig::default();
        assert_eq!(c.max_lines, 4);
        assert!(c.parallel && c.parity_pruning && c.board_pruning);
    }

    #[test]
    fn test_presets() {
        let b = SolverConfig::brute_force();
        assert!(!b.parallel && !b.parity_pruning && !b.board_pruning);
        assert_eq!(b.max_lines, MAX_LINES);
        assert!(!SolverConfig::serial().parallel);
        assert!(SolverConfig::serial().parity_pruning);
    }

    #[test]
    fn test_builder() {
        let c = SolverConfig::default()
            .with_max_lines(2)
            .with_parallel(false)
            .with_parity_pruning(false);
        assert_eq!(c.max_lines, 2);
        assert!(!c.parallel);
        assert!(!c.parity_pruning);
        assert!(c.board_pruning);
    }

    #[test]
    fn test_serde_round_trip() {
        let c = SolverConfig::default().with_max_lines(3);
        let json = serde_json::to_string(&c).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
