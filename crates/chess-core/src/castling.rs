//! Castling rights.

use crate::{Color, Square};

/// The four castling rights.
///
/// Values are immutable snapshots: every update returns a new value, so a
/// history of rights is simply a list of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    /// Rights with both of `color`'s rights removed.
    #[must_use]
    pub const fn without_color(self, color: Color) -> Self {
        match color {
            Color::White => CastlingRights {
                white_kingside: false,
                white_queenside: false,
                ..self
            },
            Color::Black => CastlingRights {
                black_kingside: false,
                black_queenside: false,
                ..self
            },
        }
    }

    /// Rights with the one tied to a rook home square removed.
    ///
    /// Squares other than the four corners leave the rights untouched.
    #[must_use]
    pub const fn without_rook_on(self, square: Square) -> Self {
        match (square.row(), square.col()) {
            (7, 0) => CastlingRights {
                white_queenside: false,
                ..self
            },
            (7, 7) => CastlingRights {
                white_kingside: false,
                ..self
            },
            (0, 0) => CastlingRights {
                black_queenside: false,
                ..self
            },
            (0, 7) => CastlingRights {
                black_kingside: false,
                ..self
            },
            _ => self,
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        !(self.white_kingside || self.white_queenside || self.black_kingside || self.black_queenside)
    }

    /// FEN castling field, `-` when no rights remain.
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        let mut out = String::with_capacity(4);
        if self.white_kingside {
            out.push('K');
        }
        if self.white_queenside {
            out.push('Q');
        }
        if self.black_kingside {
            out.push('k');
        }
        if self.black_queenside {
            out.push('q');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_color_keeps_other_side() {
        let rights = CastlingRights::ALL.without_color(Color::White);
        assert!(!rights.kingside(Color::White));
        assert!(!rights.queenside(Color::White));
        assert!(rights.kingside(Color::Black));
        assert!(rights.queenside(Color::Black));
    }

    #[test]
    fn without_rook_on_corners() {
        let rights = CastlingRights::ALL.without_rook_on(Square::H1);
        assert!(!rights.white_kingside);
        assert!(rights.white_queenside);

        let rights = rights.without_rook_on(Square::A8);
        assert!(!rights.black_queenside);
        assert!(rights.black_kingside);

        let unchanged = rights.without_rook_on(Square::E1);
        assert_eq!(unchanged, rights);
    }

    #[test]
    fn fen_field() {
        assert_eq!(CastlingRights::ALL.to_fen(), "KQkq");
        assert_eq!(CastlingRights::NONE.to_fen(), "-");
        let rights = CastlingRights {
            white_kingside: true,
            black_queenside: true,
            ..CastlingRights::NONE
        };
        assert_eq!(rights.to_fen(), "Kq");
    }

    #[test]
    fn empty() {
        assert!(CastlingRights::NONE.is_empty());
        assert!(CastlingRights::default().is_empty());
        assert!(!CastlingRights::ALL.is_empty());
    }
}
