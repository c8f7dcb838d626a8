//! Configuration file loading for the terminal board.
//!
//! Settings come from a TOML file (`chess.toml` by default). Every field has
//! a default, so a missing file or a partial file is fine.

use chess_analysis::SearchLimit;
use chess_core::PieceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// External engine settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path to a UCI engine executable.
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,
    /// Search depth, used when `movetime_ms` is 0.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Thinking time per request in milliseconds.
    #[serde(default = "default_movetime_ms")]
    pub movetime_ms: u64,
    /// Whether to start the engine at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[cfg(windows)]
fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish/stockfish-windows-x86-64.exe")
}

#[cfg(not(windows))]
fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish/stockfish")
}

fn default_depth() -> u32 {
    15
}

fn default_movetime_ms() -> u64 {
    2000
}

fn default_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            depth: default_depth(),
            movetime_ms: default_movetime_ms(),
            enabled: default_enabled(),
        }
    }
}

impl EngineConfig {
    pub fn search_limit(&self) -> SearchLimit {
        if self.movetime_ms > 0 {
            SearchLimit::MoveTime(Duration::from_millis(self.movetime_ms))
        } else {
            SearchLimit::Depth(self.depth)
        }
    }
}

/// Board interaction settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Piece used when a promotion is entered without one (`q`, `r`, `b`, `n`).
    #[serde(default = "default_promotion")]
    pub promotion: String,
}

fn default_promotion() -> String {
    "q".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            promotion: default_promotion(),
        }
    }
}

impl BoardConfig {
    /// The configured promotion piece, falling back to a queen.
    pub fn promotion_kind(&self) -> PieceKind {
        let mut chars = self.promotion.chars();
        match (chars.next().and_then(PieceKind::from_char), chars.next()) {
            (Some(kind), None) if kind.is_promotion_target() => kind,
            _ => {
                tracing::warn!(promotion = %self.promotion, "invalid promotion piece, using a queen");
                PieceKind::Queen
            }
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub board: BoardConfig,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            board: BoardConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration at `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// or [`ConfigError::Parse`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_full_config() {
        let toml_content = r#"
log_level = "debug"

[engine]
path = "/usr/bin/stockfish"
depth = 20
movetime_ms = 500
enabled = false

[board]
promotion = "n"
"#;

        let config: CliConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.engine.path, PathBuf::from("/usr/bin/stockfish"));
        assert_eq!(config.engine.depth, 20);
        assert_eq!(config.engine.movetime_ms, 500);
        assert!(!config.engine.enabled);
        assert_eq!(config.board.promotion_kind(), PieceKind::Knight);
    }

    #[test]
    fn empty_config_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.engine.depth, 15);
        assert_eq!(config.engine.movetime_ms, 2000);
        assert!(config.engine.enabled);
        assert_eq!(config.board.promotion_kind(), PieceKind::Queen);
        assert_eq!(config.log_level, "info");
    }

    #[cfg(not(windows))]
    #[test]
    fn engine_path_default() {
        let config: CliConfig = toml::from_str("[engine]\ndepth = 3\n").unwrap();
        assert_eq!(config.engine.path, PathBuf::from("stockfish/stockfish"));
        assert_eq!(config.engine.depth, 3);
    }

    #[test]
    fn search_limit() {
        let mut engine = EngineConfig::default();
        assert_eq!(
            engine.search_limit(),
            SearchLimit::MoveTime(Duration::from_millis(2000))
        );
        engine.movetime_ms = 0;
        assert_eq!(engine.search_limit(), SearchLimit::Depth(15));
    }

    #[test]
    fn invalid_promotion_falls_back_to_queen() {
        for bad in ["k", "p", "", "qq", "x"] {
            let board = BoardConfig {
                promotion: bad.to_string(),
            };
            assert_eq!(board.promotion_kind(), PieceKind::Queen, "{:?}", bad);
        }
        let rook = BoardConfig {
            promotion: "R".to_string(),
        };
        assert_eq!(rook.promotion_kind(), PieceKind::Rook);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nenabled = false").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert!(!config.engine.enabled);
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("chess.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine\npath = ").unwrap();

        match CliConfig::load(file.path()) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn config_path_returns_expected_path() {
        assert_eq!(CliConfig::config_path(), PathBuf::from("chess.toml"));
    }
}
