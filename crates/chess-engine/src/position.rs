//! Chess position: board, turn, rights history and the move log.

use chess_core::{CastlingRights, Color, Fen, FenError, Move, MoveKey, Piece, PieceKind, Square};

use crate::movegen::{self, CheckInfo, MoveList};
use crate::rules::{self, GameResult};
use crate::Board;

/// State that a move can change but not reconstruct on undo.
///
/// One snapshot exists per half-move played plus the initial one, so undo
/// simply drops the last entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    /// King squares indexed by color.
    kings: [Square; 2],
    move_log: Vec<Move>,
    /// Always one entry longer than `move_log`.
    state_log: Vec<Snapshot>,
    fullmove_number: u32,
}

impl Position {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        Position {
            board: Board::standard(),
            side_to_move: Color::White,
            kings: [Square::E1, Square::E8],
            move_log: Vec::new(),
            state_log: vec![Snapshot {
                castling: CastlingRights::ALL,
                en_passant: None,
                halfmove_clock: 0,
            }],
            fullmove_number: 1,
        }
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;
        let board = Board::from_placement(parsed.placement);

        let mut kings = [Square::E1, Square::E8];
        for color in Color::BOTH {
            kings[color.index()] = board
                .find_king(color)
                .ok_or(FenError::InvalidKingCount { color, count: 0 })?;
        }

        Ok(Position {
            board,
            side_to_move: parsed.side_to_move,
            kings,
            move_log: Vec::new(),
            state_log: vec![Snapshot {
                castling: parsed.castling,
                en_passant: parsed.en_passant,
                halfmove_clock: parsed.halfmove_clock,
            }],
            fullmove_number: parsed.fullmove_number,
        })
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let state = self.snapshot();
        Fen {
            placement: *self.board.placement(),
            side_to_move: self.side_to_move,
            castling: state.castling,
            en_passant: state.en_passant,
            halfmove_clock: state.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// The snapshot in force for the current half-move.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        // The log is seeded with one entry and never popped below it.
        self.state_log[self.state_log.len() - 1]
    }

    /// Snapshots from the initial position to the current one.
    #[inline]
    pub fn state_log(&self) -> &[Snapshot] {
        &self.state_log
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.snapshot().castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.snapshot().en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.snapshot().halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.move_log.last().copied()
    }

    /// Applies a legal move produced by the move generator.
    ///
    /// The move is not re-validated. For promotions, `promotion` picks the
    /// new piece, falling back to the piece already recorded on the move;
    /// anything other than knight, bishop, rook or queen (or no choice at
    /// all) promotes to a queen. The logged move records the piece actually
    /// chosen.
    pub fn make_move(&mut self, m: Move, promotion: Option<PieceKind>) {
        let us = self.side_to_move;
        let moved = m.piece_moved();
        let mut m = m;

        self.board.set(m.from(), None);

        let placed = if m.is_promotion() {
            let kind = match promotion.or(m.promoted_to()) {
                Some(kind) if kind.is_promotion_target() => kind,
                Some(kind) => {
                    tracing::warn!("cannot promote to {}, using a queen", kind);
                    PieceKind::Queen
                }
                None => PieceKind::Queen,
            };
            m = m.with_promotion(kind);
            Piece::new(us, kind)
        } else {
            moved
        };
        self.board.set(m.to(), Some(placed));

        if m.is_en_passant() {
            self.board.set(m.en_passant_victim(), None);
        }

        if m.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(m);
            let rook = self.board.take(rook_from);
            self.board.set(rook_to, rook);
        }

        if moved.kind == PieceKind::King {
            self.kings[us.index()] = m.to();
        }

        let previous = self.snapshot();
        let mut castling = previous.castling;
        match moved.kind {
            PieceKind::King => castling = castling.without_color(us),
            PieceKind::Rook if m.from().row() == us.back_row() => {
                castling = castling.without_rook_on(m.from());
            }
            _ => {}
        }
        if m.is_capture() {
            castling = castling.without_rook_on(m.to());
        }

        let en_passant = if m.is_double_push() {
            Some(Square::new((m.from().row() + m.to().row()) / 2, m.from().col()))
        } else {
            None
        };

        let halfmove_clock = if moved.kind == PieceKind::Pawn || m.is_capture() {
            0
        } else {
            previous.halfmove_clock + 1
        };

        self.state_log.push(Snapshot {
            castling,
            en_passant,
            halfmove_clock,
        });
        self.move_log.push(m);

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.opposite();
    }

    /// Takes back the most recent move, returning it.
    ///
    /// Does nothing and returns `None` when no move has been played.
    pub fn undo_move(&mut self) -> Option<Move> {
        let m = self.move_log.pop()?;
        self.state_log.pop();

        let moved = m.piece_moved();
        let us = moved.color;

        self.board.set(m.from(), Some(moved));
        if m.is_en_passant() {
            self.board.set(m.to(), None);
            self.board.set(m.en_passant_victim(), m.piece_captured());
        } else {
            self.board.set(m.to(), m.piece_captured());
        }

        if m.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(m);
            let rook = self.board.take(rook_to);
            self.board.set(rook_from, rook);
        }

        if moved.kind == PieceKind::King {
            self.kings[us.index()] = m.from();
        }

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1).max(1);
        }
        self.side_to_move = us;

        Some(m)
    }

    /// Every legal move for the side to move.
    pub fn valid_moves(&self) -> MoveList {
        movegen::generate_moves(self)
    }

    /// Finds the legal move with the given start and end squares.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        self.valid_moves().find(MoveKey::new(from, to))
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        movegen::is_square_attacked(&self.board, self.king_square(us), us.opposite())
    }

    /// Checks and pins against the side to move's king.
    pub fn check_info(&self) -> CheckInfo {
        let us = self.side_to_move;
        movegen::check_info(&self.board, self.king_square(us), us)
    }

    /// Returns true if the side not to move attacks `sq`.
    pub fn square_under_attack(&self, sq: Square) -> bool {
        movegen::is_square_attacked(&self.board, sq, self.side_to_move.opposite())
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.valid_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.valid_moves().is_empty()
    }

    /// Stalemate or insufficient material.
    pub fn is_draw(&self) -> bool {
        self.is_stalemate() || rules::is_insufficient_material(&self.board)
    }

    /// The result of the game if it has ended in this position.
    pub fn outcome(&self) -> Option<GameResult> {
        rules::game_result(self)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Rook start and end squares for a castling move.
fn castle_rook_squares(m: Move) -> (Square, Square) {
    let row = m.from().row();
    if m.is_kingside_castle() {
        (Square::new(row, 7), Square::new(row, m.to().col() - 1))
    } else {
        (Square::new(row, 0), Square::new(row, m.to().col() + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(position: &mut Position, uci: &str) -> Move {
        let from = sq(&uci[0..2]);
        let to = sq(&uci[2..4]);
        let m = position
            .find_move(from, to)
            .unwrap_or_else(|| panic!("{} is not legal", uci));
        let promotion = uci[4..].chars().next().and_then(PieceKind::from_char);
        position.make_move(m, promotion);
        m
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::new();
        assert_eq!(pos.to_fen(), Fen::STARTPOS);
        assert_eq!(Position::from_fen(Fen::STARTPOS).unwrap(), pos);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn piece_at() {
        let pos = Position::new();
        assert_eq!(
            pos.piece_at(Square::E1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            pos.piece_at(Square::E8),
            Some(Piece::new(Color::Black, PieceKind::King))
        );
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn logs_stay_in_step() {
        let mut pos = Position::new();
        assert_eq!(pos.state_log().len(), 1);
        play(&mut pos, "e2e4");
        play(&mut pos, "e7e5");
        assert_eq!(pos.move_log().len(), 2);
        assert_eq!(pos.state_log().len(), 3);
        pos.undo_move();
        assert_eq!(pos.state_log().len(), 2);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut pos = Position::new();
        play(&mut pos, "e2e4");
        assert_eq!(pos.en_passant(), Some(sq("e3")));
        assert_eq!(pos.side_to_move(), Color::Black);
        play(&mut pos, "g8f6");
        assert_eq!(pos.en_passant(), None);
    }

    #[test]
    fn undo_restores_previous_en_passant_target() {
        let mut pos = Position::new();
        play(&mut pos, "e2e4");
        play(&mut pos, "g8f6");
        pos.undo_move();
        assert_eq!(pos.en_passant(), Some(sq("e3")));
    }

    #[test]
    fn undo_on_empty_log_is_noop() {
        let mut pos = Position::new();
        assert_eq!(pos.undo_move(), None);
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn make_undo_restores_position() {
        let mut pos =
            Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let before = pos.clone();
        for m in pos.valid_moves() {
            pos.make_move(m, None);
            pos.undo_move();
            assert_eq!(pos, before, "make/undo of {} changed the position", m);
        }
    }

    #[test]
    fn castling_moves_rook_and_king_cache() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        play(&mut pos, "e1g1");
        assert_eq!(pos.king_square(Color::White), Square::G1);
        assert_eq!(
            pos.piece_at(Square::F1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(pos.piece_at(Square::H1), None);
        assert!(!pos.castling_rights().kingside(Color::White));
        assert!(!pos.castling_rights().queenside(Color::White));

        play(&mut pos, "e8c8");
        assert_eq!(
            pos.piece_at(Square::D8),
            Some(Piece::new(Color::Black, PieceKind::Rook))
        );
        assert_eq!(pos.piece_at(Square::A8), None);

        pos.undo_move();
        pos.undo_move();
        assert_eq!(
            pos.to_fen(),
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"
        );
        assert_eq!(pos.king_square(Color::White), Square::E1);
    }

    #[test]
    fn rook_move_forfeits_one_side() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        play(&mut pos, "h1g1");
        let rights = pos.castling_rights();
        assert!(!rights.white_kingside);
        assert!(rights.white_queenside);
        assert!(rights.black_kingside);
    }

    #[test]
    fn capturing_rook_forfeits_its_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut pos, "a1a8");
        let rights = pos.castling_rights();
        assert!(!rights.white_queenside);
        assert!(!rights.black_queenside);
        assert!(rights.black_kingside);
        assert!(rights.white_kingside);
    }

    #[test]
    fn en_passant_capture_and_undo() {
        let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let m = play(&mut pos, "e5d6");
        assert!(m.is_en_passant());
        assert_eq!(pos.piece_at(sq("d5")), None);
        assert_eq!(
            pos.piece_at(sq("d6")),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );

        pos.undo_move();
        assert_eq!(
            pos.piece_at(sq("d5")),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
        assert_eq!(pos.piece_at(sq("d6")), None);
        assert_eq!(pos.en_passant(), Some(sq("d6")));
    }

    #[test]
    fn promotion_choice_and_default() {
        let mut pos = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let m = pos.find_move(sq("a7"), Square::A8).unwrap();

        pos.make_move(m, Some(PieceKind::Knight));
        assert_eq!(
            pos.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(pos.last_move().unwrap().promoted_to(), Some(PieceKind::Knight));
        pos.undo_move();
        assert_eq!(
            pos.piece_at(sq("a7")),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );

        pos.make_move(m, Some(PieceKind::King));
        assert_eq!(
            pos.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        pos.undo_move();

        pos.make_move(m, None);
        assert_eq!(
            pos.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        pos.undo_move();

        pos.make_move(m.with_promotion(PieceKind::Rook), None);
        assert_eq!(
            pos.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        pos.undo_move();

        pos.make_move(m.with_promotion(PieceKind::Rook), Some(PieceKind::Bishop));
        assert_eq!(
            pos.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Bishop))
        );
    }

    #[test]
    fn counters_follow_moves() {
        let mut pos = Position::new();
        play(&mut pos, "g1f3");
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 1);
        play(&mut pos, "g8f6");
        assert_eq!(pos.fullmove_number(), 2);
        play(&mut pos, "e2e4");
        assert_eq!(pos.halfmove_clock(), 0);
        pos.undo_move();
        pos.undo_move();
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(pos.halfmove_clock(), 1);
    }

    #[test]
    fn square_under_attack_uses_opponent() {
        let mut pos = Position::new();
        assert!(!pos.square_under_attack(sq("e3")));
        assert!(pos.square_under_attack(sq("e6")));
        play(&mut pos, "e2e4");
        assert!(pos.square_under_attack(sq("d5")));
        assert!(!pos.square_under_attack(sq("d6")));
    }

    #[test]
    fn fools_mate() {
        let mut pos = Position::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut pos, uci);
        }
        assert!(pos.in_check());
        assert!(pos.is_checkmate());
        assert!(!pos.is_stalemate());
        assert!(!pos.is_draw());
        assert_eq!(pos.outcome(), Some(GameResult::BlackWins));
        assert_eq!(pos.check_info().checks.len(), 1);
    }

    #[test]
    fn stalemate() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!pos.in_check());
        assert!(pos.is_stalemate());
        assert!(pos.is_draw());
    }
}
