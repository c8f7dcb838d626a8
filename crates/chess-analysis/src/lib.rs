//! Position scoring and external engine integration.
//!
//! These are collaborators layered on top of `chess-engine`; the rules core
//! never depends on them.
//!
//! # Overview
//!
//! - [`Evaluation`] - Position evaluation (centipawn or mate score)
//! - [`evaluate_position`] - Static heuristic scorer (material, pawn table,
//!   mobility, pawn structure)
//! - [`EngineBridge`] - Request/response seam to an external engine
//! - [`UciEngine`] - Bridge implementation for UCI engines like Stockfish
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{EngineBridge, SearchLimit, UciEngine};
//! use chess_engine::Position;
//!
//! let position = Position::new();
//! let mut engine = UciEngine::new("stockfish/stockfish", SearchLimit::Depth(15))?;
//! let suggestion = engine.suggest(&position)?;
//! println!("{} ({})", suggestion.key(), suggestion.evaluation);
//! ```

pub mod engine;
pub mod evaluation;
pub mod evaluator;

pub use engine::{EngineBridge, EngineError, EngineSuggestion, SearchLimit, UciEngine};
pub use evaluation::{Evaluation, MATE_SCORE};
pub use evaluator::{evaluate_position, piece_value};
