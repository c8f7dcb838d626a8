//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{CastlingRights, Color, Piece, PieceKind, Square};
use std::fmt;
use thiserror::Error;

/// Piece placement indexed `[row][col]`, row 0 being rank 8.
pub type Placement = [[Option<Piece>; 8]; 8];

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("{color} must have exactly one king, found {count}")]
    InvalidKingCount { color: Color, count: usize },
}

/// A parsed FEN record.
///
/// Parsing checks syntax and the basic board sanity the move generator
/// relies on (one king per side, no pawns on the back ranks); it does not
/// check that the position is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub placement: Placement,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    ///
    /// The two move counters may be omitted and default to `0 1`.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;
        if let Some(target) = en_passant {
            Self::check_en_passant(&placement, side_to_move, target)?;
        }

        let halfmove_clock = match parts.get(4) {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(s.to_string()))?,
            None => 0,
        };

        let fullmove_number = match parts.get(5) {
            Some(s) => match s.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(FenError::InvalidFullmoveNumber(s.to_string())),
            },
            None => 1,
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<Placement, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board: Placement = [[None; 8]; 8];
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "invalid skip '{}' in rank {}",
                            c,
                            8 - row
                        )));
                    }
                    col += skip as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if col < 8 {
                        board[row][col] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
                if col > 8 {
                    break;
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    col
                )));
            }
        }

        for color in Color::BOTH {
            let count = board
                .iter()
                .flatten()
                .filter(|p| **p == Some(Piece::new(color, PieceKind::King)))
                .count();
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        for row in [0usize, 7] {
            if board[row]
                .iter()
                .any(|p| matches!(p, Some(p) if p.kind == PieceKind::Pawn))
            {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "pawn on rank {}",
                    8 - row
                )));
            }
        }

        Ok(board)
    }

    fn parse_castling(castling: &str) -> Result<CastlingRights, FenError> {
        if castling == "-" {
            return Ok(CastlingRights::NONE);
        }

        let mut rights = CastlingRights::NONE;
        for c in castling.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            }
        }

        Ok(rights)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank_char() == '3' || sq.rank_char() == '6' => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// A target is only consistent with the board if the opponent's pawn
    /// just double-pushed past it: the target is on the mover's sixth rank,
    /// empty, with an enemy pawn directly in front of it.
    fn check_en_passant(
        placement: &Placement,
        side_to_move: Color,
        target: Square,
    ) -> Result<(), FenError> {
        let them = side_to_move.opposite();
        let expected_row = (them.pawn_start_row() as i8 + them.pawn_direction()) as u8;
        let pawn_square = target.offset(them.pawn_direction(), 0);

        let consistent = target.row() == expected_row
            && placement[target.row() as usize][target.col() as usize].is_none()
            && pawn_square.is_some_and(|sq| {
                placement[sq.row() as usize][sq.col() as usize]
                    == Some(Piece::new(them, PieceKind::Pawn))
            });

        if consistent {
            Ok(())
        } else {
            Err(FenError::InvalidEnPassantSquare(format!(
                "{} does not follow a {} double push",
                target.to_algebraic(),
                them
            )))
        }
    }

    /// Converts the record back to a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_string()
    }

    /// Writes just the piece placement field.
    pub fn placement_to_fen(placement: &Placement) -> String {
        let mut out = String::with_capacity(72);
        for (row, rank) in placement.iter().enumerate() {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for square in rank {
                match square {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ep = self
            .en_passant
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} {} {} {} {} {}",
            Self::placement_to_fen(&self.placement),
            self.side_to_move.to_fen_char(),
            self.castling.to_fen(),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl std::str::FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fen::parse(s)
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
