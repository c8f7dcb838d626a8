//! Legal move generation.
//!
//! Generation runs in three steps: a check/pin scan outward from the king,
//! pseudo-legal generation per piece that already honors pins, and a final
//! filter that keeps only check-resolving moves when the king is attacked.

mod attacks;
pub mod perft;

use crate::{Board, Position};
use chess_core::{CastlingRights, Color, Move, MoveKey, Piece, PieceKind, Square};

pub use attacks::{
    check_info, is_square_attacked, Check, CheckInfo, Direction, Pin, ALL_DIRECTIONS, DIAGONALS,
    KNIGHT_OFFSETS, ORTHOGONALS,
};

/// An ordered list of legal moves.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Creates an empty move list.
    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(48),
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        self.moves.retain(f);
    }

    /// Looks a move up by its `(start, end)` key.
    pub fn find(&self, key: MoveKey) -> Option<Move> {
        self.moves.iter().copied().find(|m| m.key() == key)
    }

    #[inline]
    pub fn contains_key(&self, key: MoveKey) -> bool {
        self.find(key).is_some()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    generate_moves_for(position, position.side_to_move())
}

/// Generates all legal moves `color` would have if it were its turn.
///
/// The en passant target only belongs to the side to move, so it is ignored
/// when generating for the other color.
pub fn generate_moves_for(position: &Position, color: Color) -> MoveList {
    let board = position.board();
    let king = position.king_square(color);
    let info = check_info(board, king, color);
    let en_passant = if color == position.side_to_move() {
        position.en_passant()
    } else {
        None
    };

    let mut moves = MoveList::new();

    if info.is_double_check() {
        king_moves(board, king, color, &mut moves);
        return moves;
    }

    for (from, piece) in board.pieces_of(color) {
        let pin = info.pin_on(from);
        match piece.kind {
            PieceKind::Pawn => pawn_moves(board, from, piece, pin, en_passant, king, &mut moves),
            PieceKind::Knight => knight_moves(board, from, piece, pin, &mut moves),
            PieceKind::Bishop => slider_moves(board, from, piece, pin, &DIAGONALS, &mut moves),
            PieceKind::Rook => slider_moves(board, from, piece, pin, &ORTHOGONALS, &mut moves),
            PieceKind::Queen => slider_moves(board, from, piece, pin, &ALL_DIRECTIONS, &mut moves),
            PieceKind::King => {
                king_moves(board, from, color, &mut moves);
                if !info.in_check {
                    castle_moves(board, from, color, position.castling_rights(), &mut moves);
                }
            }
        }
    }

    if let [check] = info.checks.as_slice() {
        let targets = check.resolving_squares(king);
        moves.retain(|m| {
            m.piece_moved().kind == PieceKind::King
                || targets.contains(&m.to())
                || (m.is_en_passant() && m.en_passant_victim() == check.square)
        });
    }

    moves
}

#[inline]
fn pin_allows(pin: Option<&Pin>, d: Direction) -> bool {
    pin.map_or(true, |pin| pin.allows(d))
}

fn pawn_moves(
    board: &Board,
    from: Square,
    pawn: Piece,
    pin: Option<&Pin>,
    en_passant: Option<Square>,
    king: Square,
    moves: &mut MoveList,
) {
    let us = pawn.color;
    let forward = us.pawn_direction();

    if pin_allows(pin, (forward, 0)) {
        if let Some(one) = from.offset(forward, 0) {
            if board.is_empty(one) {
                moves.push(Move::new(from, one, pawn, None));
                if from.row() == us.pawn_start_row() {
                    if let Some(two) = one.offset(forward, 0) {
                        if board.is_empty(two) {
                            moves.push(Move::new(from, two, pawn, None));
                        }
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if !pin_allows(pin, (forward, dc)) {
            continue;
        }
        let Some(to) = from.offset(forward, dc) else {
            continue;
        };
        match board[to] {
            Some(target) if target.color != us => {
                moves.push(Move::new(from, to, pawn, Some(target)));
            }
            None if en_passant == Some(to) => {
                let m = Move::en_passant(from, to, pawn);
                if en_passant_keeps_king_safe(board, m, king) {
                    moves.push(m);
                }
            }
            _ => {}
        }
    }
}

/// Plays an en passant capture on a scratch board and checks the king.
///
/// Both pawns leave the king's rank at once, which can expose the king
/// along it in a way the pin scan cannot see.
fn en_passant_keeps_king_safe(board: &Board, m: Move, king: Square) -> bool {
    let mut trial = board.clone();
    let pawn = trial.take(m.from());
    trial.set(m.en_passant_victim(), None);
    trial.set(m.to(), pawn);
    !is_square_attacked(&trial, king, m.piece_moved().color.opposite())
}

fn knight_moves(board: &Board, from: Square, knight: Piece, pin: Option<&Pin>, moves: &mut MoveList) {
    // A pinned knight can never stay on its pin line.
    if pin.is_some() {
        return;
    }
    for (dr, dc) in KNIGHT_OFFSETS {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match board[to] {
            None => moves.push(Move::new(from, to, knight, None)),
            Some(target) if target.color != knight.color => {
                moves.push(Move::new(from, to, knight, Some(target)))
            }
            Some(_) => {}
        }
    }
}

fn slider_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    pin: Option<&Pin>,
    directions: &[Direction],
    moves: &mut MoveList,
) {
    for &d in directions {
        if !pin_allows(pin, d) {
            continue;
        }
        let mut current = from;
        while let Some(to) = current.offset(d.0, d.1) {
            match board[to] {
                None => moves.push(Move::new(from, to, piece, None)),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::new(from, to, piece, Some(target)));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// King steps, each checked by placing the king on a copy of the board.
fn king_moves(board: &Board, from: Square, us: Color, moves: &mut MoveList) {
    let king = Piece::new(us, PieceKind::King);
    for (dr, dc) in ALL_DIRECTIONS {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        let captured = board[to];
        if matches!(captured, Some(p) if p.color == us) {
            continue;
        }
        let mut trial = board.clone();
        trial.set(from, None);
        trial.set(to, Some(king));
        if !is_square_attacked(&trial, to, us.opposite()) {
            moves.push(Move::new(from, to, king, captured));
        }
    }
}

/// Castling moves for a king that is not in check.
fn castle_moves(
    board: &Board,
    from: Square,
    us: Color,
    rights: CastlingRights,
    moves: &mut MoveList,
) {
    let row = us.back_row();
    if from != Square::new(row, 4) {
        return;
    }
    let them = us.opposite();
    let king = Piece::new(us, PieceKind::King);
    let rook = Some(Piece::new(us, PieceKind::Rook));
    let empty = |col: u8| board.is_empty(Square::new(row, col));
    let safe = |col: u8| !is_square_attacked(board, Square::new(row, col), them);

    if rights.kingside(us)
        && board[Square::new(row, 7)] == rook
        && empty(5)
        && empty(6)
        && safe(5)
        && safe(6)
    {
        moves.push(Move::castle(from, Square::new(row, 6), king));
    }

    if rights.queenside(us)
        && board[Square::new(row, 0)] == rook
        && empty(1)
        && empty(2)
        && empty(3)
        && safe(3)
        && safe(2)
    {
        moves.push(Move::castle(from, Square::new(row, 2), king));
    }
}
