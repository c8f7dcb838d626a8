//! Move representation.

use crate::{Piece, PieceKind, Square};
use std::fmt;

/// The `(start, end)` pair that identifies a move within a legal-move list.
///
/// User input (two clicked squares, a UCI string, an engine reply) is
/// resolved against generated moves by this key alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveKey {
    pub from: Square,
    pub to: Square,
}

impl MoveKey {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        MoveKey { from, to }
    }
}

impl fmt::Display for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A move written in UCI coordinate notation (e.g., "e2e4", "e7e8q").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub key: MoveKey,
    pub promotion: Option<PieceKind>,
}

impl UciMove {
    /// Parses a UCI move string.
    ///
    /// Only the syntax is checked; the caller resolves the key against the
    /// legal moves of its position.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            Some(c) => match PieceKind::from_char(c) {
                Some(kind) if kind.is_promotion_target() => Some(kind),
                _ => return None,
            },
            None => None,
        };
        Some(UciMove {
            key: MoveKey::new(from, to),
            promotion,
        })
    }
}

/// A chess move.
///
/// Moves are immutable values produced by the move generator. Besides the
/// two squares they carry the moving piece, the captured piece (if any) and
/// the special-move flags, which is everything needed to undo them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    is_promotion: bool,
    is_en_passant: bool,
    is_castle: bool,
    promoted_to: Option<PieceKind>,
}

impl Move {
    /// Creates a regular move or capture.
    ///
    /// A pawn arriving on its promotion row is flagged as a promotion.
    pub const fn new(from: Square, to: Square, piece_moved: Piece, piece_captured: Option<Piece>) -> Self {
        let is_promotion = matches!(piece_moved.kind, PieceKind::Pawn)
            && to.row() == piece_moved.color.promotion_row();
        Move {
            from,
            to,
            piece_moved,
            piece_captured,
            is_promotion,
            is_en_passant: false,
            is_castle: false,
            promoted_to: None,
        }
    }

    /// Creates an en passant capture; the captured pawn is implied.
    pub const fn en_passant(from: Square, to: Square, pawn: Piece) -> Self {
        Move {
            from,
            to,
            piece_moved: pawn,
            piece_captured: Some(Piece::new(pawn.color.opposite(), PieceKind::Pawn)),
            is_promotion: false,
            is_en_passant: true,
            is_castle: false,
            promoted_to: None,
        }
    }

    /// Creates a castling move, expressed as the king's two-square step.
    pub const fn castle(from: Square, to: Square, king: Piece) -> Self {
        Move {
            from,
            to,
            piece_moved: king,
            piece_captured: None,
            is_promotion: false,
            is_en_passant: false,
            is_castle: true,
            promoted_to: None,
        }
    }

    /// Returns a copy recording the piece this promotion produced.
    ///
    /// Non-promotions are returned unchanged.
    #[must_use]
    pub const fn with_promotion(self, kind: PieceKind) -> Self {
        if self.is_promotion {
            Move {
                promoted_to: Some(kind),
                ..self
            }
        } else {
            self
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn key(self) -> MoveKey {
        MoveKey::new(self.from, self.to)
    }

    #[inline]
    pub const fn piece_moved(self) -> Piece {
        self.piece_moved
    }

    #[inline]
    pub const fn piece_captured(self) -> Option<Piece> {
        self.piece_captured
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.piece_captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.is_promotion
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.is_en_passant
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.is_castle
    }

    /// True for O-O, false for O-O-O and every non-castling move.
    #[inline]
    pub const fn is_kingside_castle(self) -> bool {
        self.is_castle && self.to.col() > self.from.col()
    }

    /// The piece a committed promotion produced, if recorded.
    #[inline]
    pub const fn promoted_to(self) -> Option<PieceKind> {
        self.promoted_to
    }

    /// Returns true for a pawn advancing two squares.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.piece_moved.kind, PieceKind::Pawn)
            && self.from.row().abs_diff(self.to.row()) == 2
    }

    /// Square of the pawn removed by an en passant capture.
    ///
    /// It sits beside the start square, one row behind the destination.
    #[inline]
    pub const fn en_passant_victim(self) -> Square {
        Square::new(self.from.row(), self.to.col())
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match (self.is_promotion, self.promoted_to) {
            (true, Some(kind)) => format!("{}{}{}", self.from, self.to, kind.to_char()),
            (true, None) => format!("{}{}q", self.from, self.to),
            _ => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
