//! Copy-make: applying a move yields a fresh [`Board`].

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::piece::{Color, PieceKind};
use crate::square::{Rank, Square};

/// Rights lost by any move touching `sq`, as source or destination.
const fn rights_lost(sq: Square) -> CastleRights {
    match sq {
        Square::E1 => CastleRights::WHITE_BOTH,
        Square::A1 => CastleRights::WHITE_QUEEN,
        Square::H1 => CastleRights::WHITE_KING,
        Square::E8 => CastleRights::BLACK_BOTH,
        Square::A8 => CastleRights::BLACK_QUEEN,
        Square::H8 => CastleRights::BLACK_KING,
        _ => CastleRights::NONE,
    }
}

/// Rook source and destination for a castle landing the king on `king_dest`.
fn castle_rook(king_dest: Square) -> Option<(Square, Square)> {
    match king_dest {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

impl Board {
    fn relocate(&mut self, from: Square, to: Square, kind: PieceKind, color: Color) {
        self.toggle_piece(from, kind, color);
        self.toggle_piece(to, kind, color);
    }

    /// The position after `mv`. `self` is left untouched.
    ///
    /// Moves from an empty square, and castles to a square no king castles
    /// to, return an unchanged copy.
    pub fn make_move(&self, mv: Move) -> Board {
        let (from, to) = (mv.source(), mv.dest());
        let Some(moving) = self.colored_piece_on(from) else {
            return *self;
        };
        let us = moving.color();
        let them = !us;

        let mut next = *self;
        let mut captured = false;
        next.set_en_passant(None);

        match mv.kind() {
            MoveKind::Castling => {
                let Some((rook_from, rook_to)) = castle_rook(to) else {
                    return *self;
                };
                next.relocate(from, to, PieceKind::King, us);
                next.relocate(rook_from, rook_to, PieceKind::Rook, us);
            }
            MoveKind::EnPassant => {
                let victim = Square::new(from.rank(), to.file());
                next.toggle_piece(victim, PieceKind::Pawn, them);
                next.relocate(from, to, PieceKind::Pawn, us);
                captured = true;
            }
            kind => {
                if let Some(victim) = self.colored_piece_on(to) {
                    next.toggle_piece(to, victim.kind(), victim.color());
                    captured = true;
                }
                next.toggle_piece(from, moving.kind(), us);
                let landed = match kind {
                    MoveKind::Promotion => mv.promotion_piece().to_piece_kind(),
                    _ => moving.kind(),
                };
                next.toggle_piece(to, landed, us);

                let double_push = moving.kind() == PieceKind::Pawn
                    && from.rank() == Rank::Rank2.relative_to(us)
                    && to.rank() == Rank::Rank4.relative_to(us);
                if double_push {
                    next.set_en_passant(Some(Square::new(Rank::Rank3.relative_to(us), from.file())));
                }
            }
        }

        next.set_castling(self.castling().remove(rights_lost(from)).remove(rights_lost(to)));
        let reset = captured || moving.kind() == PieceKind::Pawn;
        next.set_halfmove_clock(if reset { 0 } else { self.halfmove_clock() + 1 });
        next.set_side_to_move(them);
        if us == Color::Black {
            next.set_fullmove_number(self.fullmove_number() + 1);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::castle_rights::CastleRights;
    use crate::chess_move::{Move, PromotionPiece};
    use crate::piece::{Color, Piece, PieceKind};
    use crate::square::Square;

    #[test]
    fn double_push_sets_en_passant_square() {
        let after = Board::starting_position().make_move(Move::new(Square::E2, Square::E4));
        assert_eq!(after.en_passant(), Some(Square::E3));
        assert_eq!(after.side_to_move(), Color::Black);
        assert_eq!(after.halfmove_clock(), 0);

        let reply = after.make_move(Move::new(Square::D7, Square::D5));
        assert_eq!(reply.en_passant(), Some(Square::D6));
        assert_eq!(reply.fullmove_number(), 2);
        let single = reply.make_move(Move::new(Square::A2, Square::A3));
        assert_eq!(single.en_passant(), None);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let board: Board = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        let after = board.make_move(Move::new_en_passant(Square::E5, Square::D6));
        assert_eq!(after.colored_piece_on(Square::D6), Some(Piece::WHITE_PAWN));
        assert_eq!(after.piece_on(Square::D5), None);
        assert_eq!(after.piece_on(Square::E5), None);
    }

    #[test]
    fn capture_promotion_replaces_victim() {
        let board: Board = "3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let after = board.make_move(Move::new_promotion(Square::E7, Square::D8, PromotionPiece::Knight));
        assert_eq!(after.colored_piece_on(Square::D8), Some(Piece::WHITE_KNIGHT));
        assert_eq!(after.side(Color::Black).count(), 1);
        assert_eq!(after.pieces(PieceKind::Pawn).count(), 0);
    }

    #[test]
    fn castling_moves_rook_and_revokes_rights() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 10".parse().unwrap();
        let after = board.make_move(Move::new_castle(Square::E8, Square::C8));
        assert_eq!(after.piece_on(Square::C8), Some(PieceKind::King));
        assert_eq!(after.piece_on(Square::D8), Some(PieceKind::Rook));
        assert_eq!(after.piece_on(Square::A8), None);
        assert_eq!(after.castling(), CastleRights::WHITE_BOTH);
        assert_eq!(after.fullmove_number(), 11);
        assert_eq!(after.halfmove_clock(), 4);
    }

    #[test]
    fn rook_capture_revokes_the_victims_right() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let after = board.make_move(Move::new(Square::H1, Square::H8));
        assert_eq!(after.castling(), CastleRights::WHITE_QUEEN.insert(CastleRights::BLACK_QUEEN));
        assert_eq!(after.halfmove_clock(), 0);
    }

    #[test]
    fn empty_source_is_a_no_op() {
        let board = Board::starting_position();
        assert_eq!(board.make_move(Move::new(Square::E4, Square::E5)), board);
    }
}
