//! Bridge to an external strength-evaluating engine.
//!
//! [`EngineBridge`] is the narrow request/response seam: hand over a
//! position, get back a suggested move and an evaluation. [`UciEngine`]
//! implements it over a child process speaking UCI, such as Stockfish.

use crate::Evaluation;
use chess_core::{Move, MoveKey, UciMove};
use chess_engine::{MoveList, Position};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;
use thiserror::Error;

/// Maximum number of lines to read before giving up on a UCI response.
pub const MAX_UCI_LINES: usize = 1000;

/// Number of principal-variation moves kept in a suggestion.
pub const PV_LENGTH: usize = 3;

/// Errors that can occur when working with chess engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Spawning or talking to the engine process failed.
    #[error("Engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Engine failed to initialize properly (UCI handshake failed).
    #[error("Engine initialization failed")]
    InitFailed,
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
}

/// How long the engine may think about a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    /// Search to a fixed depth in plies.
    Depth(u32),
    /// Search for a fixed wall-clock time.
    MoveTime(Duration),
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit::MoveTime(Duration::from_secs(2))
    }
}

impl SearchLimit {
    fn go_command(self) -> String {
        match self {
            SearchLimit::Depth(depth) => format!("go depth {}", depth),
            SearchLimit::MoveTime(time) => format!("go movetime {}", time.as_millis()),
        }
    }
}

/// A move recommendation from an external engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSuggestion {
    /// The suggested move with its optional promotion piece.
    pub best: UciMove,
    /// Evaluation relative to the side to move.
    pub evaluation: Evaluation,
    /// The deepest search depth reported.
    pub depth: u32,
    /// The first moves of the principal variation, in UCI notation.
    pub pv: Vec<String>,
}

impl EngineSuggestion {
    /// The (from, to) key of the suggested move.
    pub fn key(&self) -> MoveKey {
        self.best.key
    }

    /// Looks the suggestion up in a legal-move list.
    ///
    /// Returns `None` if the engine suggested something that is not legal,
    /// for instance because it was analysing a different position.
    pub fn resolve(&self, legal: &MoveList) -> Option<Move> {
        let m = legal.find(self.best.key)?;
        Some(match self.best.promotion {
            Some(kind) => m.with_promotion(kind),
            None => m,
        })
    }
}

/// Anything that can suggest a move for a position.
pub trait EngineBridge {
    /// Asks for the best move in `position`.
    fn suggest(&mut self, position: &Position) -> Result<EngineSuggestion, EngineError>;
}

/// One parsed `info` line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InfoLine {
    depth: u32,
    evaluation: Evaluation,
    pv: Vec<String>,
}

/// Wrapper for UCI-compatible engines like Stockfish.
///
/// The process is started and handshaken in [`UciEngine::new`] and told to
/// quit when the wrapper is dropped.
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// The engine's name (reported via UCI id).
    name: String,
    limit: SearchLimit,
}

impl UciEngine {
    /// Spawns the engine at `engine_path` and performs the UCI handshake.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if the engine path doesn't exist
    /// - `EngineError::Io` if the engine process fails to start
    /// - `EngineError::InitFailed` if UCI initialization fails
    pub fn new(engine_path: &str, limit: SearchLimit) -> Result<Self, EngineError> {
        if !std::path::Path::new(engine_path).exists() {
            return Err(EngineError::NotFound(engine_path.to_string()));
        }

        let mut process = Command::new(engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = process.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = process.stdout.take().ok_or(EngineError::InitFailed)?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: String::new(),
            limit,
        };
        engine.init_uci()?;

        tracing::debug!(name = %engine.name, path = engine_path, "engine ready");
        Ok(engine)
    }

    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send_command("uci")?;

        let mut name = String::new();
        for _ in 0..=MAX_UCI_LINES {
            let line = self.read_line()?;
            if let Some(id) = line.strip_prefix("id name ") {
                name = id.to_string();
            } else if line == "uciok" {
                self.name = if name.is_empty() {
                    "Unknown Engine".to_string()
                } else {
                    name
                };
                return self.wait_ready();
            }
        }
        Err(EngineError::InitFailed)
    }

    fn wait_ready(&mut self) -> Result<(), EngineError> {
        self.send_command("isready")?;
        for _ in 0..=MAX_UCI_LINES {
            if self.read_line()? == "readyok" {
                return Ok(());
            }
        }
        Err(EngineError::InitFailed)
    }

    /// Returns the engine's name as reported via UCI protocol.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limit(&self) -> SearchLimit {
        self.limit
    }

    pub fn set_limit(&mut self, limit: SearchLimit) {
        self.limit = limit;
    }

    /// Tells the engine a new game starts and waits until it is ready.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.send_command("ucinewgame")?;
        self.wait_ready()
    }

    /// Analyzes a position given in FEN notation.
    pub fn analyze_fen(&mut self, fen: &str) -> Result<EngineSuggestion, EngineError> {
        self.send_command(&format!("position fen {}", fen))?;
        let go = self.limit.go_command();
        self.send_command(&go)?;

        let mut latest: Option<InfoLine> = None;
        for _ in 0..=MAX_UCI_LINES {
            let line = self.read_line()?;

            if line.starts_with("info ") {
                if let Some(info) = Self::parse_info_line(&line) {
                    latest = Some(info);
                }
            } else if let Some(rest) = line.strip_prefix("bestmove") {
                let text = rest.split_whitespace().next().unwrap_or("");
                let best = UciMove::parse(text).ok_or_else(|| {
                    EngineError::InvalidResponse(format!("unusable best move '{}'", text))
                })?;

                let info = latest.unwrap_or(InfoLine {
                    depth: 0,
                    evaluation: Evaluation::Centipawns(0),
                    pv: Vec::new(),
                });
                let mut pv = info.pv;
                pv.truncate(PV_LENGTH);

                let suggestion = EngineSuggestion {
                    best,
                    evaluation: info.evaluation,
                    depth: info.depth,
                    pv,
                };
                tracing::debug!(
                    best = %suggestion.key(),
                    evaluation = %suggestion.evaluation,
                    depth = suggestion.depth,
                    "engine suggestion"
                );
                return Ok(suggestion);
            }
        }

        Err(EngineError::InvalidResponse(
            "Too many lines without bestmove".to_string(),
        ))
    }

    /// Parses a UCI info line carrying depth, score and optionally a PV.
    ///
    /// Format: "info depth X ... score cp Y ... pv move1 move2 ..."
    /// or: "info depth X ... score mate Y ... pv move1 move2 ..."
    fn parse_info_line(line: &str) -> Option<InfoLine> {
        let mut parts = line.split_whitespace();

        let mut depth: Option<u32> = None;
        let mut cp: Option<i32> = None;
        let mut mate: Option<i32> = None;
        let mut pv: Vec<String> = Vec::new();

        while let Some(token) = parts.next() {
            match token {
                "depth" => depth = parts.next().and_then(|d| d.parse().ok()),
                "score" => match parts.next() {
                    Some("cp") => cp = parts.next().and_then(|v| v.parse().ok()),
                    Some("mate") => mate = parts.next().and_then(|v| v.parse().ok()),
                    _ => {}
                },
                "pv" => {
                    pv.extend(parts.by_ref().map(str::to_string));
                }
                _ => {}
            }
        }

        Some(InfoLine {
            depth: depth?,
            evaluation: Evaluation::from_uci_score(cp, mate)?,
            pv,
        })
    }

    fn send_command(&mut self, command: &str) -> Result<(), EngineError> {
        tracing::trace!(command, "uci >");
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(EngineError::InvalidResponse(
                "Engine closed unexpectedly".to_string(),
            ));
        }
        let line = line.trim().to_string();
        tracing::trace!(line = %line, "uci <");
        Ok(line)
    }
}

impl EngineBridge for UciEngine {
    fn suggest(&mut self, position: &Position) -> Result<EngineSuggestion, EngineError> {
        self.analyze_fen(&position.to_fen())
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send_command("quit");
        let _ = self.process.wait();
    }
}
