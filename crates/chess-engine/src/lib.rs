//! Legal move generation and game state for standard chess.
//!
//! This crate provides:
//! - [`Board`] - the 8x8 mailbox grid
//! - [`Position`] - board, turn, cached kings, castling/en passant history
//!   and the move log, with in-place make/undo
//! - [`movegen`] - check/pin scan, pin-aware generation and check filtering
//! - [`rules`] - checkmate, stalemate and insufficient material
//! - [`san`] - SAN rendering and parsing
//! - [`Game`] - move requests by coordinates, UCI or SAN with SAN history
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, Position};
//!
//! let position = Position::new();
//! println!("Legal moves from starting position: {}", position.valid_moves().len());
//!
//! let mut game = Game::new();
//! game.play_san("e4").unwrap();
//! game.play_san("e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod board;
mod game;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;

pub use board::Board;
pub use game::{Game, GameError, GameMove, HistoryRow};
pub use movegen::{
    check_info, generate_moves, generate_moves_for, is_square_attacked, CheckInfo, MoveList,
};
pub use position::{Position, Snapshot};
pub use rules::{DrawReason, GameResult};
pub use san::{move_to_san, san_to_move, SanError};
