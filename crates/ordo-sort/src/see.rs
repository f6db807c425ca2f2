//! Static Exchange Evaluation (SEE).
//!
//! Determines the material outcome of a sequence of captures on a single square,
//! assuming both sides use their least valuable attacker at each step.

use ordo_core::{Bitboard, Board, Move, PieceKind, Square, bishop_attacks, rook_attacks};

/// Material values, indexed by `PieceKind::index()`.
pub const SEE_VALUE: [i32; 6] = [100, 320, 330, 500, 900, 20_000];

/// Material value of a piece kind.
#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    SEE_VALUE[kind as usize]
}

fn least_valuable_attacker(
    attackers: Bitboard,
    side: Bitboard,
    board: &Board,
) -> Option<(Square, PieceKind)> {
    // PieceKind order is already ascending by value.
    PieceKind::ALL.into_iter().find_map(|kind| {
        (attackers & side & board.pieces(kind))
            .lsb()
            .map(|sq| (sq, kind))
    })
}

/// Full Static Exchange Evaluation.
///
/// Returns the material gain/loss from the side-to-move's perspective after
/// all profitable recaptures on the destination square. Quiet moves are
/// evaluated too: the result is zero or the loss of the moved piece.
pub fn see(board: &Board, mv: Move) -> i32 {
    let src = mv.source();
    let dst = mv.dest();
    let Some(mover) = board.piece_on(src) else {
        return 0;
    };

    let mut gain = [0i32; 32];
    gain[0] = board.captured_piece(mv).map_or(0, piece_value);

    // A promoting pawn becomes the next victim at its promoted value.
    let mut next_victim = if mv.is_promotion() {
        let promoted = piece_value(mv.promotion_piece().to_piece_kind());
        gain[0] += promoted - piece_value(PieceKind::Pawn);
        promoted
    } else {
        piece_value(mover)
    };

    let mut occ = board.occupied().without(src).with(dst);
    if mv.is_en_passant() {
        let victim = if dst.index() > src.index() { dst.index() - 8 } else { dst.index() + 8 };
        if let Some(sq) = Square::from_index(victim as u8) {
            occ = occ.without(sq);
        }
    }

    let diagonal = board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen);
    let orthogonal = board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen);

    let mut attackers = board.attackers_to(dst, occ) & occ;
    let mut side = board.side_to_move().flip();
    let mut depth = 0usize;

    while let Some((sq, kind)) = least_valuable_attacker(attackers, board.side(side), board) {
        if depth + 1 == gain.len() {
            break;
        }
        depth += 1;
        gain[depth] = next_victim - gain[depth - 1];
        next_victim = piece_value(kind);

        occ = occ.without(sq);
        // Removing a piece can uncover a slider behind it.
        if matches!(kind, PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen) {
            attackers |= bishop_attacks(dst, occ) & diagonal;
        }
        if matches!(kind, PieceKind::Rook | PieceKind::Queen) {
            attackers |= rook_attacks(dst, occ) & orthogonal;
        }
        attackers &= occ;
        side = side.flip();
    }

    // Either side may stop recapturing when continuing would lose material.
    while depth > 0 {
        depth -= 1;
        gain[depth] = -((-gain[depth]).max(gain[depth + 1]));
    }

    gain[0]
}

/// Return `true` if the SEE score is at least `threshold`.
pub fn see_ge(board: &Board, mv: Move, threshold: i32) -> bool {
    see(board, mv) >= threshold
}
