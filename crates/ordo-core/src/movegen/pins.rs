//! Checkers and absolute pins of the side to move.

use crate::attacks::{between, bishop_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::piece::PieceKind;

/// `(checkers, pinned)`: enemy pieces giving check, and our pieces that
/// alone stand between our king and an enemy slider.
pub(crate) fn compute_checkers_and_pinned(board: &Board) -> (Bitboard, Bitboard) {
    let us = board.side_to_move();
    let king = board.king_square(us);
    let theirs = board.side(us.flip());
    let diagonal = board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen);
    let straight = board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen);

    let leapers = knight_attacks(king) & board.pieces(PieceKind::Knight)
        | pawn_attacks(us, king) & board.pieces(PieceKind::Pawn);
    let xrays = bishop_attacks(king, Bitboard::EMPTY) & diagonal
        | rook_attacks(king, Bitboard::EMPTY) & straight;

    let mut checkers = leapers & theirs;
    let mut pinned = Bitboard::EMPTY;
    for slider in xrays & theirs {
        let blockers = between(king, slider) & board.occupied();
        if blockers.is_empty() {
            checkers |= slider.bitboard();
        } else if blockers.count() == 1 {
            pinned |= blockers & board.side(us);
        }
    }
    (checkers, pinned)
}
