use crate::Board;
use chess_core::PieceKind;

/// Returns true if neither side has the material to deliver mate.
///
/// Recognized cases: king against king, king and one minor piece against a
/// lone king, and king and bishop against king and bishop with both bishops
/// on squares of the same color. Anything else, K+N+N against K included,
/// counts as sufficient.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors = Vec::with_capacity(2);
    for (sq, piece) in board.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => {
                if minors.len() == 2 {
                    return false;
                }
                minors.push((sq, piece));
            }
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }

    match minors.as_slice() {
        [] | [_] => true,
        [(sq_a, a), (sq_b, b)] => {
            a.kind == PieceKind::Bishop
                && b.kind == PieceKind::Bishop
                && a.color != b.color
                && sq_a.is_light() == sq_b.is_light()
        }
        _ => false,
    }
}
