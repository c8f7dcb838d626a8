//! Core types for chess.
//!
//! This crate provides the fundamental types used across the workspace:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates (row 0 is rank 8)
//! - [`Move`], [`MoveKey`] and [`UciMove`] for move representation
//! - [`CastlingRights`] snapshots
//! - FEN parsing and serialization via [`Fen`]

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{Fen, FenError, Placement};
pub use mov::{Move, MoveKey, UciMove};
pub use piece::{Piece, PieceKind};
pub use square::Square;
