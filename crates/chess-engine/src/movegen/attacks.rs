//! Ray tables, attack queries, and the check/pin scan.
//!
//! Everything here is a pure function of a [`Board`]: the attacking color is
//! always passed explicitly and nothing is mutated.

use crate::Board;
use chess_core::{Color, Piece, PieceKind, Square};

/// A `(row, col)` step.
pub type Direction = (i8, i8);

/// Rook directions.
pub const ORTHOGONALS: [Direction; 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Bishop directions.
pub const DIAGONALS: [Direction; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Queen and king directions: the orthogonals followed by the diagonals.
pub const ALL_DIRECTIONS: [Direction; 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

pub const KNIGHT_OFFSETS: [Direction; 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[inline]
const fn is_orthogonal(d: Direction) -> bool {
    d.0 == 0 || d.1 == 0
}

#[inline]
pub(crate) const fn reverse(d: Direction) -> Direction {
    (-d.0, -d.1)
}

/// Returns true if a piece of color `by` attacks `sq`.
///
/// Pawns attack diagonally forward only; a pawn push is never an attack.
/// Whatever stands on `sq` itself is ignored.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    // A pawn of `by` attacking sq sits one row behind it from `by`'s view.
    let behind = -by.pawn_direction();
    for dc in [-1, 1] {
        if let Some(from) = sq.offset(behind, dc) {
            if board[from] == Some(Piece::new(by, PieceKind::Pawn)) {
                return true;
            }
        }
    }

    for (dr, dc) in KNIGHT_OFFSETS {
        if let Some(from) = sq.offset(dr, dc) {
            if board[from] == Some(Piece::new(by, PieceKind::Knight)) {
                return true;
            }
        }
    }

    for d in ALL_DIRECTIONS {
        let mut current = sq;
        let mut distance = 0;
        while let Some(next) = current.offset(d.0, d.1) {
            distance += 1;
            current = next;
            let Some(piece) = board[next] else {
                continue;
            };
            if piece.color == by {
                let attacks = match piece.kind {
                    PieceKind::Queen => true,
                    PieceKind::Rook => is_orthogonal(d),
                    PieceKind::Bishop => !is_orthogonal(d),
                    PieceKind::King => distance == 1,
                    PieceKind::Pawn | PieceKind::Knight => false,
                };
                if attacks {
                    return true;
                }
            }
            break;
        }
    }

    false
}

/// A friendly piece that shields its own king from an enemy slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    /// Direction from the king towards the pinned piece.
    pub direction: Direction,
}

impl Pin {
    /// Returns true if moving along `d` keeps the piece on the pin line.
    #[inline]
    pub fn allows(&self, d: Direction) -> bool {
        d == self.direction || d == reverse(self.direction)
    }
}

/// An enemy piece giving check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub square: Square,
    pub kind: PieceKind,
    /// Step from the king towards the checker; a knight offset for knights.
    pub direction: Direction,
}

impl Check {
    /// Squares a non-king move may land on to resolve this check: the
    /// checker itself plus, for sliders, the line between it and the king.
    pub fn resolving_squares(&self, king: Square) -> Vec<Square> {
        if self.kind == PieceKind::Knight {
            return vec![self.square];
        }
        let mut squares = Vec::with_capacity(7);
        let mut current = king;
        while let Some(next) = current.offset(self.direction.0, self.direction.1) {
            squares.push(next);
            if next == self.square {
                break;
            }
            current = next;
        }
        squares
    }
}

/// Result of scanning outward from a king.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInfo {
    pub in_check: bool,
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

impl CheckInfo {
    /// The pin on `sq`, if the piece there is pinned.
    pub fn pin_on(&self, sq: Square) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.square == sq)
    }

    #[inline]
    pub fn is_double_check(&self) -> bool {
        self.checks.len() >= 2
    }
}

/// Scans the eight rays and the knight offsets around the king of `color`
/// standing on `king`, collecting checks and pins.
pub fn check_info(board: &Board, king: Square, color: Color) -> CheckInfo {
    let enemy = color.opposite();
    let mut info = CheckInfo::default();

    for d in ALL_DIRECTIONS {
        let mut shield: Option<Square> = None;
        let mut current = king;
        let mut distance = 0;

        while let Some(next) = current.offset(d.0, d.1) {
            distance += 1;
            current = next;
            let Some(piece) = board[next] else {
                continue;
            };

            if piece.color == color {
                if shield.is_some() {
                    break;
                }
                shield = Some(next);
                continue;
            }

            let attacks = match piece.kind {
                PieceKind::Queen => true,
                PieceKind::Rook => is_orthogonal(d),
                PieceKind::Bishop => !is_orthogonal(d),
                // An enemy pawn hits the king only from one row ahead of it.
                PieceKind::Pawn => distance == 1 && d.0 == -enemy.pawn_direction() && d.1 != 0,
                PieceKind::King => distance == 1,
                PieceKind::Knight => false,
            };

            if attacks {
                match shield {
                    Some(square) => info.pins.push(Pin {
                        square,
                        direction: d,
                    }),
                    None => {
                        info.in_check = true;
                        info.checks.push(Check {
                            square: next,
                            kind: piece.kind,
                            direction: d,
                        });
                    }
                }
            }
            break;
        }
    }

    for d in KNIGHT_OFFSETS {
        if let Some(sq) = king.offset(d.0, d.1) {
            if board[sq] == Some(Piece::new(enemy, PieceKind::Knight)) {
                info.in_check = true;
                info.checks.push(Check {
                    square: sq,
                    kind: PieceKind::Knight,
                    direction: d,
                });
            }
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Fen;

    fn board(fen: &str) -> Board {
        Board::from_placement(Fen::parse(fen).unwrap().placement)
    }

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn pawn_attacks_diagonally_forward_only() {
        let b = board("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        assert!(is_square_attacked(&b, sq("d5"), Color::White));
        assert!(is_square_attacked(&b, sq("f5"), Color::White));
        // The push square and squares behind are not attacked.
        assert!(!is_square_attacked(&b, sq("e5"), Color::White));
        assert!(!is_square_attacked(&b, sq("d3"), Color::White));

        let b = board("4k3/8/8/4p3/8/8/8/4K3 b - - 0 1");
        assert!(is_square_attacked(&b, sq("d4"), Color::Black));
        assert!(!is_square_attacked(&b, sq("d6"), Color::Black));
    }

    #[test]
    fn startpos_attacks() {
        let b = Board::standard();
        assert!(is_square_attacked(&b, sq("e3"), Color::White));
        assert!(is_square_attacked(&b, sq("f3"), Color::White));
        assert!(!is_square_attacked(&b, sq("e4"), Color::White));
        assert!(is_square_attacked(&b, sq("f6"), Color::Black));
        assert!(!is_square_attacked(&b, sq("e5"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let b = board("4k3/8/8/8/r2P4/8/8/4K3 w - - 0 1");
        assert!(is_square_attacked(&b, sq("c4"), Color::Black));
        assert!(is_square_attacked(&b, sq("d4"), Color::Black));
        assert!(!is_square_attacked(&b, sq("e4"), Color::Black));
        assert!(is_square_attacked(&b, sq("a1"), Color::Black));
    }

    #[test]
    fn king_attacks_adjacent_squares() {
        let b = board("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(is_square_attacked(&b, sq("d2"), Color::White));
        assert!(!is_square_attacked(&b, sq("e3"), Color::White));
    }

    #[test]
    fn scan_finds_slider_check() {
        let b = board("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        let info = check_info(&b, Square::E1, Color::White);
        assert!(info.in_check);
        assert_eq!(info.checks.len(), 1);
        assert!(info.pins.is_empty());

        let check = info.checks[0];
        assert_eq!(check.square, Square::A1);
        assert_eq!(check.kind, PieceKind::Rook);
        assert_eq!(
            check.resolving_squares(Square::E1),
            vec![Square::D1, Square::C1, sq("b1"), Square::A1]
        );
    }

    #[test]
    fn scan_finds_pin() {
        let b = board("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let info = check_info(&b, Square::E1, Color::White);
        assert!(!info.in_check);
        assert_eq!(info.pins.len(), 1);
        let pin = info.pin_on(sq("e2")).unwrap();
        assert_eq!(pin.direction, (-1, 0));
        assert!(pin.allows((1, 0)));
        assert!(!pin.allows((0, 1)));
    }

    #[test]
    fn two_shields_means_no_pin() {
        let b = board("4r1k1/8/8/8/4B3/8/4N3/4K3 w - - 0 1");
        let info = check_info(&b, Square::E1, Color::White);
        assert!(!info.in_check);
        assert!(info.pins.is_empty());
    }

    #[test]
    fn pawn_checks_only_from_the_front() {
        // Black pawn on d2 checks the king on e1.
        let b = board("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        let info = check_info(&b, Square::E1, Color::White);
        assert!(info.in_check);
        assert_eq!(info.checks[0].kind, PieceKind::Pawn);

        // A black pawn beside or behind the king does not.
        let b = board("4k3/8/8/8/8/3pK3/3p4/8 w - - 0 1");
        assert!(!check_info(&b, sq("e3"), Color::White).in_check);

        // White pawn on d7 checks the black king on e8.
        let b = board("4k3/3P4/8/8/8/8/8/4K3 b - - 0 1");
        assert!(check_info(&b, Square::E8, Color::Black).in_check);
    }

    #[test]
    fn knight_and_slider_double_check() {
        let b = board("4k3/8/8/8/8/5n2/8/4K2r w - - 0 1");
        let info = check_info(&b, Square::E1, Color::White);
        assert!(info.in_check);
        assert!(info.is_double_check());
        let knight = info
            .checks
            .iter()
            .find(|c| c.kind == PieceKind::Knight)
            .unwrap();
        assert_eq!(knight.resolving_squares(Square::E1), vec![sq("f3")]);
    }
}
