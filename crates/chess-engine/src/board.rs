//! The 8x8 mailbox board.

use chess_core::{Color, Fen, Piece, PieceKind, Placement, Square};
use std::fmt;

/// An 8x8 grid of optional pieces.
///
/// Row 0 is rank 8. The board knows nothing about turns or rights; it is
/// owned and mutated by [`Position`](crate::Position), and freely copied by
/// the move generator for trial placements.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: Placement,
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Creates the standard initial array.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for color in Color::BOTH {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                board.squares[color.back_row() as usize][col] = Some(Piece::new(color, *kind));
                board.squares[color.pawn_start_row() as usize][col] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    /// Creates a board from a parsed FEN placement.
    pub const fn from_placement(squares: Placement) -> Self {
        Board { squares }
    }

    /// The raw grid, indexed `[row][col]`.
    #[inline]
    pub const fn placement(&self) -> &Placement {
        &self.squares
    }

    #[inline]
    pub const fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Removes and returns whatever stands on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    #[inline]
    pub const fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Every occupied square in scan order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Occupied squares holding pieces of `color`, in scan order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Finds the king of `color` by scanning; positions cache this instead.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(sq, _)| sq)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::ops::Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq.row() as usize][sq.col() as usize]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", Fen::placement_to_fen(&self.squares))
    }
}

/// Renders the board as ASCII, white at the bottom.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rank) in self.squares.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for square in rank {
                let c = square.map_or('.', |p| p.to_fen_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
