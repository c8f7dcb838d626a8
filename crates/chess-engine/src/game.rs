//! Game management on top of [`Position`].
//!
//! [`Game`] is what an interactive board talks to: it accepts user move
//! requests as coordinates, UCI or SAN, resolves them against the legal-move
//! list, keeps the SAN history for display and tracks the result.

use crate::rules::GameResult;
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{MoveList, Position};
use chess_core::{Color, FenError, Move, MoveKey, PieceKind, Square, UciMove};
use thiserror::Error;

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move as committed, including the promotion choice.
    pub mov: Move,
    /// SAN notation for the move.
    pub san: String,
}

/// One numbered line of the move history, e.g. `1. e4 e5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

impl std::fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number, self.white.as_deref().unwrap_or("..."))?;
        if let Some(black) = &self.black {
            write!(f, " {}", black)?;
        }
        Ok(())
    }
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The SAN string could not be resolved.
    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),
    /// The game has already ended.
    #[error("game is over: {0}")]
    GameOver(GameResult),
}

/// A chess game with history tracking.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    moves: Vec<GameMove>,
    /// Side to move and move number of the starting position.
    start: (Color, u32),
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Self {
        let result = position.outcome();
        Game {
            start: (position.side_to_move(), position.fullmove_number()),
            position,
            moves: Vec::new(),
            result,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        self.position.valid_moves()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.in_check()
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Plays the legal move from `from` to `to`.
    ///
    /// `promotion` is only consulted for promotions; see
    /// [`Position::make_move`] for how invalid choices are handled.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, GameError> {
        if let Some(result) = self.result {
            return Err(GameError::GameOver(result));
        }

        let key = MoveKey::new(from, to);
        let m = self
            .legal_moves()
            .find(key)
            .ok_or_else(|| GameError::IllegalMove(key.to_string()))?;

        Ok(self.commit(m, promotion))
    }

    /// Plays a move given in UCI notation.
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let parsed = UciMove::parse(uci).ok_or_else(|| GameError::IllegalMove(uci.to_string()))?;
        self.play(parsed.key.from, parsed.key.to, parsed.promotion)
    }

    /// Plays a move given in SAN notation.
    pub fn play_san(&mut self, san: &str) -> Result<Move, GameError> {
        if let Some(result) = self.result {
            return Err(GameError::GameOver(result));
        }

        let m = san_to_move(&self.position, san)?;
        Ok(self.commit(m, m.promoted_to()))
    }

    fn commit(&mut self, m: Move, promotion: Option<PieceKind>) -> Move {
        let committed = match promotion {
            Some(kind) if kind.is_promotion_target() => m.with_promotion(kind),
            Some(kind) if m.is_promotion() => {
                tracing::warn!("cannot promote to {}, using a queen", kind);
                m.with_promotion(PieceKind::Queen)
            }
            _ => m.with_promotion(PieceKind::Queen),
        };

        let san = move_to_san(&self.position, committed);
        self.position.make_move(committed, committed.promoted_to());

        tracing::debug!(mv = %committed, %san, "move played");

        self.moves.push(GameMove { mov: committed, san });
        self.result = self.position.outcome();
        if let Some(result) = self.result {
            tracing::debug!(%result, "game over");
        }
        committed
    }

    /// Takes back the last move. Returns `None` if no move has been played.
    pub fn undo(&mut self) -> Option<Move> {
        let m = self.position.undo_move()?;
        self.moves.pop();
        self.result = self.position.outcome();
        tracing::debug!(mv = %m, "move undone");
        Some(m)
    }

    /// Discards the game and starts again from the standard position.
    pub fn reset(&mut self) {
        *self = Game::new();
        tracing::debug!("game reset");
    }

    /// Groups the SAN history into numbered rows for display.
    ///
    /// A game that started with black to move gets an empty white slot in
    /// its first row.
    pub fn history_rows(&self) -> Vec<HistoryRow> {
        let (mut color, mut number) = self.start;
        let mut rows: Vec<HistoryRow> = Vec::new();

        for entry in &self.moves {
            match color {
                Color::White => rows.push(HistoryRow {
                    number,
                    white: Some(entry.san.clone()),
                    black: None,
                }),
                Color::Black => {
                    match rows.last_mut() {
                        Some(row) if row.black.is_none() && row.number == number => {
                            row.black = Some(entry.san.clone());
                        }
                        _ => rows.push(HistoryRow {
                            number,
                            white: None,
                            black: Some(entry.san.clone()),
                        }),
                    }
                    number += 1;
                }
            }
            color = color.opposite();
        }

        rows
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DrawReason;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert!(!game.is_game_over());
        assert!(!game.is_check());
    }

    #[test]
    fn play_coordinates() {
        let mut game = Game::new();
        let m = game.play(sq("e2"), sq("e4"), None).unwrap();
        assert!(m.is_double_push());
        assert_eq!(game.move_history()[0].san, "e4");
    }

    #[test]
    fn play_uci() {
        let mut game = Game::new();
        game.play_uci("e2e4").unwrap();
        assert_eq!(game.ply_count(), 1);
        assert_eq!(game.move_history()[0].san, "e4");
    }

    #[test]
    fn play_san() {
        let mut game = Game::new();
        game.play_san("e4").unwrap();
        game.play_san("e5").unwrap();
        assert_eq!(game.ply_count(), 2);
    }

    #[test]
    fn illegal_move() {
        let mut game = Game::new();
        assert_eq!(
            game.play_uci("e2e5"),
            Err(GameError::IllegalMove("e2e5".to_string()))
        );
        assert!(game.play_uci("nonsense").is_err());
        assert!(matches!(game.play_san("Ke2"), Err(GameError::InvalidSan(_))));
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn promotion_is_recorded() {
        let mut game = Game::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        let m = game.play_uci("a7a8n").unwrap();
        assert_eq!(m.promoted_to(), Some(PieceKind::Knight));
        assert_eq!(game.move_history()[0].san, "a8=N");

        game.undo();
        game.play_san("a8=R").unwrap();
        assert_eq!(game.move_history()[0].san, "a8=R");
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.play_san(san).unwrap();
        }
        assert!(game.is_game_over());
        assert_eq!(game.result(), Some(GameResult::BlackWins));
        assert_eq!(game.move_history()[3].san, "Qh4#");
        assert_eq!(
            game.play_san("a3"),
            Err(GameError::GameOver(GameResult::BlackWins))
        );
    }

    #[test]
    fn undo_reopens_finished_game() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.play_san(san).unwrap();
        }
        let m = game.undo().unwrap();
        assert_eq!(m.to(), sq("h4"));
        assert!(!game.is_game_over());
        assert_eq!(game.ply_count(), 3);
    }

    #[test]
    fn undo_on_fresh_game() {
        let mut game = Game::new();
        assert_eq!(game.undo(), None);
    }

    #[test]
    fn reset_starts_over() {
        let mut game = Game::new();
        game.play_san("d4").unwrap();
        game.reset();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.to_fen(), chess_core::Fen::STARTPOS);
    }

    #[test]
    fn stalemate() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.result(), Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn insufficient_material() {
        let game = Game::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert!(game.is_game_over());
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn history_rows() {
        let mut game = Game::new();
        for san in ["e4", "e5", "Nf3"] {
            game.play_san(san).unwrap();
        }
        let rows = game.history_rows();
        assert_eq!(
            rows,
            vec![
                HistoryRow {
                    number: 1,
                    white: Some("e4".to_string()),
                    black: Some("e5".to_string()),
                },
                HistoryRow {
                    number: 2,
                    white: Some("Nf3".to_string()),
                    black: None,
                },
            ]
        );
        assert_eq!(rows[0].to_string(), "1. e4 e5");
    }

    #[test]
    fn history_rows_from_black_to_move() {
        let mut game =
            Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        game.play_san("c5").unwrap();
        game.play_san("Nf3").unwrap();
        let rows = game.history_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].white, None);
        assert_eq!(rows[0].black.as_deref(), Some("c5"));
        assert_eq!(rows[0].to_string(), "1. ... c5");
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].white.as_deref(), Some("Nf3"));
    }
}
