//! Game outcomes: checkmate, stalemate and draws by material.

mod material;

pub use material::is_insufficient_material;

use crate::Position;
use chess_core::Color;
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// The winning color, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }

    /// PGN-style score string.
    pub const fn score(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "White wins by checkmate"),
            GameResult::BlackWins => write!(f, "Black wins by checkmate"),
            GameResult::Draw(reason) => write!(f, "Draw by {}", reason),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::Stalemate => write!(f, "stalemate"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

/// Returns the game result if the game is over in this position.
///
/// Checkmate and stalemate take precedence over insufficient material.
pub fn game_result(position: &Position) -> Option<GameResult> {
    if position.valid_moves().is_empty() {
        if position.in_check() {
            return Some(match position.side_to_move() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            });
        }
        return Some(GameResult::Draw(DrawReason::Stalemate));
    }

    if is_insufficient_material(position.board()) {
        return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
    }

    None
}
