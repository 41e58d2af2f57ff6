use std::{
    fs,
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use pcfind_core::{expand_queue, Board};
use pcfind_search::{PcSolver, SolverConfig, MAX_LINES};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::QueueReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum Mode {
    /// Only report whether a perfect clear exists
    Exists,
    /// List every perfect clear
    #[default]
    Solve,
}

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Perfect clear finder", long_about = None)]
pub(crate) struct CommandArgs {
    /// Board rows, top first, separated by newlines, '|' or '/'
    #[arg(long, conflicts_with_all = ["board_file", "fumen"])]
    board: Option<String>,
    /// File holding the board rows
    #[arg(long, conflicts_with = "fumen")]
    board_file: Option<PathBuf>,
    /// Board as a v115 fumen string, first page field
    #[arg(long)]
    fumen: Option<String>,
    /// Queue notation, e.g. `T,[IOSZ]p3` or `*!`
    #[arg(long)]
    queue: String,
    /// Lines to clear
    #[arg(long, default_value_t = MAX_LINES)]
    lines: usize,
    #[arg(long, value_enum, default_value_t = Mode::Solve)]
    mode: Mode,
    /// Disable the columnar parity check
    #[arg(long)]
    no_parity: bool,
    /// Search on a single thread
    #[arg(long)]
    serial: bool,
    /// One JSON object per queue
    #[arg(long)]
    json: bool,
    /// Log search progress to stderr
    #[arg(long)]
    verbose: bool,
}

impl CommandArgs {
    fn config(&self) -> SolverConfig {
        SolverConfig::default()
            .with_max_lines(self.lines)
            .with_parity_pruning(!self.no_parity)
            .with_parallel(!self.serial)
    }

    fn board(&self) -> anyhow::Result<Board> {
        if let Some(fumen) = &self.fumen {
            return Board::from_fumen(fumen).context("Failed to decode fumen");
        }
        let text = match (&self.board, &self.board_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read board file: {}", path.display()))?,
            (None, None) => return Ok(Board::new()),
        };
        text.parse().context("Failed to parse board")
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);

    let board = args.board()?;
    let queues = expand_queue(&args.queue).context("Failed to parse queue")?;
    if queues.is_empty() {
        bail!("queue notation '{}' produced no queues", args.queue);
    }
    info!(queues = queues.len(), "expanded queue notation");

    let solver = PcSolver::new(args.config());
    let mut out = io::stdout().lock();
    for queue in &queues {
        let report = match args.mode {
            Mode::Exists => {
                let found = solver.find_pc(&board, queue)?;
                QueueReport::new(queue, found.into_iter().collect())
            }
            Mode::Solve => QueueReport::new(queue, solver.solve_pcs(&board, queue)?),
        };
        if args.json {
            serde_json::to_writer(&mut out, &report).context("Failed to write JSON")?;
            writeln!(out)?;
        } else {
            report.write_text(&mut out, args.mode == Mode::Solve)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CommandArgs, clap::Error> {
        CommandArgs::try_parse_from(std::iter::once("pcfind").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--queue", "TIO"]).unwrap();
        assert_eq!(args.mode, Mode::Solve);
        assert_eq!(args.lines, MAX_LINES);
        assert_eq!(args.config(), SolverConfig::default());
        assert_eq!(args.board().unwrap(), Board::new());
    }

    #[test]
    fn test_flags_reach_config() {
        let args = parse(&[
            "--queue", "TIO", "--lines", "2", "--no-parity", "--serial", "--mode", "exists",
        ])
        .unwrap();
        assert_eq!(args.mode, Mode::Exists);
        let config = args.config();
        assert_eq!(config.max_lines, 2);
        assert!(!config.parity_pruning);
        assert!(!config.parallel);
        assert!(config.board_pruning);
    }

    #[test]
    fn test_board_text() {
        let args = parse(&["--queue", "I", "--board", "######...."]).unwrap();
        assert_eq!(args.board().unwrap().filled_cells(), 6);

        let bad = parse(&["--queue", "I", "--board", "###"]).unwrap();
        assert!(bad.board().is_err());
    }

    #[test]
    fn test_board_sources_conflict() {
        assert!(parse(&["--queue", "I", "--board", "..........", "--board-file", "b.txt"]).is_err());
        assert!(parse(&["--queue", "I", "--board", "..........", "--fumen", "v115@vhAAgH"]).is_err());
        assert!(parse(&["--queue", "I", "--board-file", "b.txt", "--fumen", "v115@vhAAgH"]).is_err());
    }

    #[test]
    fn test_board_fumen() {
        let args = parse(&["--queue", "I", "--fumen", "v115@vhAAgH"]).unwrap();
        assert!(args.board().unwrap().is_empty());

        let args = parse(&["--queue", "I", "--fumen", "v115@RhB8HeD8PeAgH"]).unwrap();
        assert_eq!(args.board().unwrap().filled_cells(), 6);

        let bad = parse(&["--queue", "I", "--fumen", "vhAAgH"]).unwrap();
        assert!(bad.board().is_err());
    }

    #[test]
    fn test_queue_required() {
        assert!(parse(&[]).is_err());
    }
}
