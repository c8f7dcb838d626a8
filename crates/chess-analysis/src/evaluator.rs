//! Static heuristic position scorer.
//!
//! A pure function of the position: material, a pawn piece-square table,
//! mobility and pawn structure, summed from white's point of view and then
//! turned around for the side to move.

use chess_core::{Color, PieceKind};
use chess_engine::{generate_moves_for, Board, Position};

/// Piece values in centipawns.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20000,
    }
}

/// Pawn bonuses indexed `[row][col]` from white's side, row 0 being rank 8.
const PAWN_TABLE: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const MOBILITY_WEIGHT: i32 = 10;
const DOUBLED_PAWN_PENALTY: i32 = 20;
const PASSED_PAWN_BONUS: i32 = 50;

/// Scores the position in centipawns for the side to move.
pub fn evaluate_position(position: &Position) -> i32 {
    let board = position.board();
    let score = material(board) + piece_squares(board) + mobility(position) + pawn_structure(board);

    match position.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

fn signed(color: Color, value: i32) -> i32 {
    match color {
        Color::White => value,
        Color::Black => -value,
    }
}

fn material(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, piece)| signed(piece.color, piece_value(piece.kind)))
        .sum()
}

fn piece_squares(board: &Board) -> i32 {
    board
        .pieces()
        .filter(|(_, piece)| piece.kind == PieceKind::Pawn)
        .map(|(sq, piece)| {
            let (row, col) = (sq.row() as usize, sq.col() as usize);
            match piece.color {
                Color::White => PAWN_TABLE[row][col],
                Color::Black => -PAWN_TABLE[7 - row][col],
            }
        })
        .sum()
}

fn mobility(position: &Position) -> i32 {
    let white = generate_moves_for(position, Color::White).len() as i32;
    let black = generate_moves_for(position, Color::Black).len() as i32;
    (white - black) * MOBILITY_WEIGHT
}

/// Doubled pawns cost per extra pawn on a file. A file from b to g holding
/// pawns of one color earns a passed-pawn bonus when the enemy has no pawns
/// on it or on either neighbouring file.
fn pawn_structure(board: &Board) -> i32 {
    let mut files = [[0i32; 8]; 2];
    for (sq, piece) in board.pieces() {
        if piece.kind == PieceKind::Pawn {
            files[piece.color.index()][sq.col() as usize] += 1;
        }
    }

    let mut score = 0;
    for color in Color::BOTH {
        let own = &files[color.index()];
        let enemy = &files[color.opposite().index()];

        for col in 0..8 {
            if own[col] > 1 {
                score -= signed(color, DOUBLED_PAWN_PENALTY * (own[col] - 1));
            }
            if own[col] > 0
                && (1..7).contains(&col)
                && enemy[col - 1] == 0
                && enemy[col] == 0
                && enemy[col + 1] == 0
            {
                score += signed(color, PASSED_PAWN_BONUS);
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Fen;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn starting_position_is_level() {
        assert_eq!(evaluate_position(&Position::new()), 0);
    }

    #[test]
    fn material_counts_both_sides() {
        assert_eq!(material(Position::new().board()), 0);
        let without_black_queen = position("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(material(without_black_queen.board()), 900);
    }

    #[test]
    fn pawn_table_is_mirrored_for_black() {
        let white_e4 = position("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(piece_squares(white_e4.board()), 20);

        let black_e5 = position("4k3/8/8/4p3/8/8/8/4K3 w - - 0 1");
        assert_eq!(piece_squares(black_e5.board()), -20);

        assert_eq!(piece_squares(Position::new().board()), 0);
    }

    #[test]
    fn mobility_of_lone_kings_is_even() {
        let kings = position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(mobility(&kings), 0);
        assert_eq!(evaluate_position(&kings), 0);
    }

    #[test]
    fn mobility_uses_both_sides_moves() {
        // White: four king moves and two pawn pushes. Black: five king moves.
        let p = position("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1");
        assert_eq!(mobility(&p), (6 - 5) * MOBILITY_WEIGHT);
    }

    #[test]
    fn doubled_and_passed_pawns() {
        // White d2/d3 doubled but passed, black a7 is on the edge.
        let p = position("4k3/p7/8/8/8/3P4/3P4/4K3 w - - 0 1");
        assert_eq!(pawn_structure(p.board()), -20 + 50);

        let blocked = position("4k3/4p3/8/8/8/3P4/8/4K3 w - - 0 1");
        assert_eq!(pawn_structure(blocked.board()), 0);

        assert_eq!(pawn_structure(Position::new().board()), 0);
    }

    #[test]
    fn score_is_from_side_to_move() {
        let white = position("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let black = position("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        assert!(evaluate_position(&white) > 900);
        assert_eq!(evaluate_position(&black), -evaluate_position(&white));
    }

    #[test]
    fn evaluate_does_not_change_position() {
        let p = position(Fen::STARTPOS);
        let before = p.clone();
        evaluate_position(&p);
        assert_eq!(p, before);
    }
}
