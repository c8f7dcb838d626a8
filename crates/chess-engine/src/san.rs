//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::movegen::MoveList;
use crate::Position;
use chess_core::{Move, PieceKind, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state BEFORE the move is made and the move must
/// be legal in it. Promotions without a recorded choice are written as
/// queen promotions.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let mut san = String::new();

    if m.is_castle() {
        san.push_str(if m.is_kingside_castle() { "O-O" } else { "O-O-O" });
        return add_check_suffix(position, m, san);
    }

    let kind = m.piece_moved().kind;

    if kind != PieceKind::Pawn {
        san.push(piece_to_san_char(kind));
        san.push_str(&disambiguation(&position.valid_moves(), m));
    }

    if m.is_capture() {
        if kind == PieceKind::Pawn {
            san.push(m.from().file_char());
        }
        san.push('x');
    }

    san.push_str(&m.to().to_algebraic());

    if m.is_promotion() {
        san.push('=');
        san.push(piece_to_san_char(m.promoted_to().unwrap_or(PieceKind::Queen)));
    }

    add_check_suffix(position, m, san)
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// For promotions the returned move carries the requested piece.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    let san = san.trim_end_matches(&['#', '+', '!', '?'][..]);

    if san == "O-O" || san == "0-0" {
        return find_castling_move(position, true);
    }
    if san == "O-O-O" || san == "0-0-0" {
        return find_castling_move(position, false);
    }

    let parsed = parse_san_components(san)?;
    find_matching_move(position, san, &parsed)
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    kind: PieceKind,
    from_file: Option<u8>,
    from_row: Option<u8>,
    to: Square,
    promotion: Option<PieceKind>,
    is_capture: bool,
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    if !san.is_ascii() {
        return Err(SanError::InvalidFormat(san.to_string()));
    }

    let (kind, rest) = match san.chars().next() {
        Some(c) if c.is_ascii_uppercase() => {
            let kind = san_char_to_piece(c).ok_or_else(|| {
                SanError::InvalidFormat(format!("invalid piece character: {}", c))
            })?;
            (kind, &san[1..])
        }
        Some(_) => (PieceKind::Pawn, san),
        None => return Err(SanError::Empty),
    };

    let (rest, promotion) = match rest.split_once('=') {
        Some((body, promo)) => {
            let mut chars = promo.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(c), None) => san_char_to_piece(c).filter(|k| k.is_promotion_target()),
                _ => None,
            }
            .ok_or_else(|| SanError::InvalidFormat(format!("invalid promotion: {}", san)))?;
            (body, Some(kind))
        }
        None => (rest, None),
    };

    let is_capture = rest.contains('x');
    let rest: String = rest.chars().filter(|&c| c != 'x').collect();

    if rest.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {}", san)));
    }
    let (disambig, dest) = rest.split_at(rest.len() - 2);
    let to = Square::from_algebraic(dest)
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid destination: {}", san)))?;

    let (from_file, from_row) = parse_disambiguation(disambig)?;

    Ok(ParsedSan {
        kind,
        from_file,
        from_row,
        to,
        promotion,
        is_capture,
    })
}

/// Parses "b", "1" or "b1" into an optional file and row.
fn parse_disambiguation(s: &str) -> Result<(Option<u8>, Option<u8>), SanError> {
    let file = |c: u8| (b'a'..=b'h').contains(&c).then(|| c - b'a');
    let row = |c: u8| (b'1'..=b'8').contains(&c).then(|| b'8' - c);

    match s.as_bytes() {
        [] => Ok((None, None)),
        [c] => match (file(*c), row(*c)) {
            (Some(f), _) => Ok((Some(f), None)),
            (None, Some(r)) => Ok((None, Some(r))),
            _ => Err(SanError::InvalidFormat(format!(
                "invalid disambiguation: {}",
                s
            ))),
        },
        [f, r] => match (file(*f), row(*r)) {
            (Some(f), Some(r)) => Ok((Some(f), Some(r))),
            _ => Err(SanError::InvalidFormat(format!(
                "invalid disambiguation: {}",
                s
            ))),
        },
        _ => Err(SanError::InvalidFormat(format!(
            "disambiguation too long: {}",
            s
        ))),
    }
}

fn find_castling_move(position: &Position, kingside: bool) -> Result<Move, SanError> {
    position
        .valid_moves()
        .iter()
        .copied()
        .find(|m| m.is_castle() && m.is_kingside_castle() == kingside)
        .ok_or_else(|| {
            let name = if kingside { "O-O" } else { "O-O-O" };
            SanError::NoMatchingMove(name.to_string())
        })
}

fn find_matching_move(position: &Position, san: &str, parsed: &ParsedSan) -> Result<Move, SanError> {
    let matching: Vec<Move> = position
        .valid_moves()
        .iter()
        .copied()
        .filter(|m| {
            m.to() == parsed.to
                && m.piece_moved().kind == parsed.kind
                && !m.is_castle()
                && parsed.from_file.map_or(true, |f| m.from().col() == f)
                && parsed.from_row.map_or(true, |r| m.from().row() == r)
                && (!parsed.is_capture || m.is_capture())
                && m.is_promotion() == parsed.promotion.is_some()
        })
        .collect();

    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(san.to_string())),
        [m] => Ok(match parsed.promotion {
            Some(kind) => m.with_promotion(kind),
            None => *m,
        }),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// File, rank or both, as needed to single out `m` among same-kind moves
/// to the same square.
fn disambiguation(legal: &MoveList, m: Move) -> String {
    let from = m.from();
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|o| {
            o.to() == m.to() && o.piece_moved().kind == m.piece_moved().kind && o.from() != from
        })
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    if rivals.iter().all(|sq| sq.col() != from.col()) {
        return from.file_char().to_string();
    }

    if rivals.iter().all(|sq| sq.row() != from.row()) {
        return from.rank_char().to_string();
    }

    from.to_algebraic()
}

fn add_check_suffix(position: &Position, m: Move, mut san: String) -> String {
    let mut after = position.clone();
    after.make_move(m, m.promoted_to());
    if after.in_check() {
        if after.valid_moves().is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

fn piece_to_san_char(kind: PieceKind) -> char {
    kind.to_char().to_ascii_uppercase()
}

fn san_char_to_piece(c: char) -> Option<PieceKind> {
    if c.is_ascii_uppercase() {
        PieceKind::from_char(c)
    } else {
        None
    }
}
