use anyhow::{anyhow, Result};
use clap::Parser;

use std::io::{stdin, stdout};

use fiar_minimax::session::{Session, SessionConfig, MAX_LEVEL, MIN_LEVEL};
use fiar_minimax::solver::SearchConfig;

/// Play Four in a Row against a minimax computer player
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Difficulty level (search depth) of the first game, asked for if omitted
    #[arg(short, long)]
    level: Option<usize>,

    /// Number of moves kept for undo
    #[arg(long, default_value_t = fiar_minimax::history::DEFAULT_CAPACITY)]
    history_size: usize,

    /// Abort a search once this many tree nodes are alive
    #[arg(long)]
    node_limit: Option<usize>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "warn")]
    log_level: log::Level,

    /// Draw the board without colours
    #[arg(long)]
    no_color: bool,

    /// Hide the spinner while the computer is thinking
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level)?;

    if let Some(level) = args.level {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(anyhow!(
                "level {} out of range, levels must be between {} and {}",
                level,
                MIN_LEVEL,
                MAX_LEVEL
            ));
        }
    }
    if args.history_size == 0 {
        return Err(anyhow!("history size must be positive"));
    }

    let config = SessionConfig {
        history_size: args.history_size,
        level: args.level,
        colour: !args.no_color,
        show_progress: !args.no_progress,
        search: SearchConfig {
            node_limit: args.node_limit,
            ..SearchConfig::default()
        },
    };

    let stdin = stdin();
    let mut session = Session::new(stdin.lock(), stdout(), config);
    session.run()
}
