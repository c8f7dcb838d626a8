//! Terminal chess board.
//!
//! Reads commands from stdin, plays them against the rules engine and
//! prints the board after every change. An external UCI engine can be
//! configured for hints.

mod command;
mod config;
mod session;

use anyhow::Context;
use chess_analysis::{EngineBridge, UciEngine};
use chess_engine::Game;
use clap::Parser;
use config::{CliConfig, EngineConfig};
use session::Session;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Play chess in the terminal")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value_os_t = CliConfig::config_path())]
    config: PathBuf,
    /// Start from this FEN instead of the initial position
    #[arg(long)]
    fen: Option<String>,
    /// Log level, overriding the configuration file
    #[arg(long)]
    log_level: Option<String>,
    /// Do not start the external engine
    #[arg(long)]
    no_engine: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let level: tracing::Level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.log_level)
        .parse()
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let game = match &cli.fen {
        Some(fen) => Game::from_fen(fen).context("Invalid starting position")?,
        None => Game::new(),
    };

    let engine = if config.engine.enabled && !cli.no_engine {
        start_engine(&config.engine)
    } else {
        None
    };

    let mut session = Session::new(game, engine, config.board.promotion_kind());
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    session.run(stdin.lock(), &mut stdout)
}

fn start_engine(config: &EngineConfig) -> Option<Box<dyn EngineBridge>> {
    let path = config.path.to_string_lossy();
    match UciEngine::new(&path, config.search_limit()) {
        Ok(engine) => {
            tracing::info!("Engine: {}", engine.name());
            Some(Box::new(engine))
        }
        Err(e) => {
            tracing::warn!("Engine unavailable, hints disabled: {}", e);
            None
        }
    }
}
