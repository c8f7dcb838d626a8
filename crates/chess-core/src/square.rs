//! Board square representation.

use std::fmt;

/// A square on the chess board, addressed by row and column.
///
/// Row 0 is rank 8 (black's back rank) and row 7 is rank 1; column 0 is
/// the a-file. The derived ordering follows board scan order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from row and column.
    ///
    /// # Panics
    /// Panics if either coordinate is outside 0-7.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "square coordinates out of range");
        Square { row, col }
    }

    /// Creates a square from signed coordinates, returning `None` off the board.
    #[inline]
    pub const fn try_new(row: i8, col: i8) -> Option<Self> {
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Returns the square `dr` rows and `dc` columns away, if still on the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::try_new(self.row as i8 + dr, self.col as i8 + dc)
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Square {
            row: 7 - (rank - b'1'),
            col: file - b'a',
        })
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// File letter, 'a'-'h'.
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Rank digit, '1'-'8'.
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }

    /// Returns true for light squares (a8 and h1 are light).
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// All 64 squares in scan order (a8, b8, ..., h1).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    // Common squares
    pub const A1: Square = Square::new(7, 0);
    pub const C1: Square = Square::new(7, 2);
    pub const D1: Square = Square::new(7, 3);
    pub const E1: Square = Square::new(7, 4);
    pub const F1: Square = Square::new(7, 5);
    pub const G1: Square = Square::new(7, 6);
    pub const H1: Square = Square::new(7, 7);
    pub const A8: Square = Square::new(0, 0);
    pub const C8: Square = Square::new(0, 2);
    pub const D8: Square = Square::new(0, 3);
    pub const E8: Square = Square::new(0, 4);
    pub const F8: Square = Square::new(0, 5);
    pub const G8: Square = Square::new(0, 6);
    pub const H8: Square = Square::new(0, 7);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_zero_is_rank_eight() {
        let a8 = Square::new(0, 0);
        assert_eq!(a8.to_algebraic(), "a8");
        assert_eq!(Square::new(7, 4).to_algebraic(), "e1");
        assert_eq!(Square::new(4, 4).to_algebraic(), "e4");
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("e4"), Some(Square::new(4, 4)));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::H8));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a0"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn offset_stays_on_board() {
        assert_eq!(Square::E1.offset(-1, 0), Some(Square::new(6, 4)));
        assert_eq!(Square::E1.offset(1, 0), None);
        assert_eq!(Square::A8.offset(0, -1), None);
        assert_eq!(Square::A8.offset(2, 1), Some(Square::new(2, 1)));
    }

    #[test]
    fn square_colors() {
        assert!(Square::A8.is_light());
        assert!(Square::H1.is_light());
        assert!(!Square::A1.is_light());
        assert!(!Square::H8.is_light());
    }

    #[test]
    fn all_squares_in_scan_order() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::A8);
        assert_eq!(squares[63], Square::H1);
        assert!(squares.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    #[should_panic]
    fn new_rejects_out_of_range() {
        let _ = Square::new(8, 0);
    }
}
