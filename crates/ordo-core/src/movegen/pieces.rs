//! Non-king move generation under check and pin constraints.

use crate::attacks::{bishop_attacks, knight_attacks, line, pawn_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{Move, PromotionPiece};
use crate::piece::Color;
use crate::piece::PieceKind;
use crate::square::Rank;
use crate::square::Square;

use super::MoveList;

/// Where a non-king piece may land without leaving its king in check.
#[derive(Debug, Clone, Copy)]
pub(super) struct Constraints {
    pub(super) king: Square,
    pub(super) pinned: Bitboard,
    /// Every square when not in check; the checker plus the squares
    /// between it and the king when in single check.
    pub(super) mask: Bitboard,
}

impl Constraints {
    #[inline]
    fn restrict(&self, src: Square, targets: Bitboard) -> Bitboard {
        let targets = targets & self.mask;
        if self.pinned.contains(src) {
            targets & line(self.king, src)
        } else {
            targets
        }
    }
}

/// Knights, bishops, rooks and queens. A pinned knight never stays on its
/// pin line, so `restrict` leaves it without moves.
pub(super) fn gen_pieces(board: &Board, constraints: &Constraints, list: &mut MoveList) {
    let ours = board.side(board.side_to_move());
    let occupied = board.occupied();

    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        for src in board.pieces(kind) & ours {
            let reach = match kind {
                PieceKind::Knight => knight_attacks(src),
                PieceKind::Bishop => bishop_attacks(src, occupied),
                PieceKind::Rook => rook_attacks(src, occupied),
                _ => queen_attacks(src, occupied),
            };
            for dst in constraints.restrict(src, reach & !ours) {
                list.push(Move::new(src, dst));
            }
        }
    }
}

fn push_pawn_move(list: &mut MoveList, us: Color, src: Square, dst: Square) {
    if dst.rank().relative_to(us) == Rank::Rank8 {
        for promo in PromotionPiece::ALL {
            list.push(Move::new_promotion(src, dst, promo));
        }
    } else {
        list.push(Move::new(src, dst));
    }
}

/// Pawn pushes, captures, promotions and en passant.
pub(super) fn gen_pawns(board: &Board, constraints: &Constraints, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    let occupied = board.occupied();
    let step: i8 = match us {
        Color::White => 8,
        Color::Black => -8,
    };
    let ahead = |sq: Square| Square::from_index((sq.index() as i8 + step) as u8);

    for src in board.colored_pieces(PieceKind::Pawn, us) {
        let mut targets = pawn_attacks(us, src) & board.side(them);
        if let Some(one) = ahead(src).filter(|&sq| !occupied.contains(sq)) {
            targets |= one.bitboard();
            if src.rank().relative_to(us) == Rank::Rank2 {
                if let Some(two) = ahead(one).filter(|&sq| !occupied.contains(sq)) {
                    targets |= two.bitboard();
                }
            }
        }
        for dst in constraints.restrict(src, targets) {
            push_pawn_move(list, us, src, dst);
        }
    }

    let Some(ep) = board.en_passant() else {
        return;
    };
    let victim = Square::new(Rank::Rank5.relative_to(us), ep.file());
    // In check the capture must land on the block square or remove the checker.
    if !(constraints.mask.contains(ep) || constraints.mask.contains(victim)) {
        return;
    }
    let rank_sliders =
        (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen)) & board.side(them);
    for src in pawn_attacks(them, ep) & board.colored_pieces(PieceKind::Pawn, us) {
        if constraints.pinned.contains(src) && !line(constraints.king, src).contains(ep) {
            continue;
        }
        // Both pawns leave the rank at once, which a pin test cannot see.
        let after = occupied.without(src).without(victim).with(ep);
        if (rook_attacks(constraints.king, after) & rank_sliders).is_nonempty() {
            continue;
        }
        list.push(Move::new_en_passant(src, ep));
    }
}
