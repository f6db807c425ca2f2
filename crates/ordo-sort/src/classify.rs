//! Good/bad capture classification.

use ordo_core::{
    Board, Move, PieceKind, Rank, Square, bishop_attacks, king_attacks, knight_attacks,
    pawn_attacks, queen_attacks, rook_attacks,
};

use crate::config::OrderingConfig;
use crate::see::{piece_value, see};

/// A losing sacrifice is only considered when SEE loses less than a minor piece.
const SACRIFICE_MARGIN: i32 = -piece_value(PieceKind::Bishop);

/// Return `true` if the tactical move `mv` should be searched with the good
/// captures rather than deferred to the end of the move list.
///
/// The first matching rule wins:
/// en passant is good, under-promotion is bad, a capturing promotion or a
/// capture of an equal or bigger piece is good, a non-losing exchange is good.
/// In PV nodes a few losing moves are let through when enabled in `config`.
pub fn capture_is_good(board: &Board, mv: Move, in_pv: bool, config: &OrderingConfig) -> bool {
    debug_assert!(board.is_tactical(mv), "classifying quiet move {mv}");

    if mv.is_en_passant() {
        return true;
    }
    if mv.is_under_promotion() {
        return false;
    }

    let captured = board.captured_piece(mv);
    if let Some(victim) = captured {
        if mv.is_promotion() {
            return true;
        }
        let mover = board.piece_on(mv.source()).map_or(0, piece_value);
        if piece_value(victim) >= mover {
            return true;
        }
    }

    let exchange = see(board, mv);
    if exchange >= 0 {
        return true;
    }

    if config.pv_queen_promotions && in_pv && mv.is_promotion() {
        return true;
    }

    if config.any_sacrifice() && in_pv && exchange > SACRIFICE_MARGIN {
        if let Some(victim) = captured {
            if config.king_attack_sacrifices && piece_attacks_enemy_king(board, mv) {
                return true;
            }
            if config.king_box_sacrifices && near_enemy_king(board, mv.dest()) {
                return true;
            }
            if config.passer_sacrifices
                && victim == PieceKind::Pawn
                && advanced_pawn(board, mv.dest())
            {
                return true;
            }
        }
    }

    false
}

/// Return `true` if the moved piece attacks the enemy king from its
/// destination, with occupancy taken after the move.
pub fn piece_attacks_enemy_king(board: &Board, mv: Move) -> bool {
    let us = board.side_to_move();
    let Some(mut kind) = board.piece_on(mv.source()) else {
        return false;
    };
    if mv.is_promotion() {
        kind = mv.promotion_piece().to_piece_kind();
    }

    let dest = mv.dest();
    let occupied = board.occupied().without(mv.source()).with(dest);
    let attacks = match kind {
        PieceKind::Pawn => pawn_attacks(us, dest),
        PieceKind::Knight => knight_attacks(dest),
        PieceKind::Bishop => bishop_attacks(dest, occupied),
        PieceKind::Rook => rook_attacks(dest, occupied),
        PieceKind::Queen => queen_attacks(dest, occupied),
        PieceKind::King => king_attacks(dest),
    };
    attacks.contains(board.king_square(us.flip()))
}

fn near_enemy_king(board: &Board, sq: Square) -> bool {
    sq.distance(board.king_square(board.side_to_move().flip())) <= 1
}

/// The captured pawn stood on its sixth or seventh rank.
fn advanced_pawn(board: &Board, sq: Square) -> bool {
    sq.rank().relative_to(board.side_to_move().flip()) >= Rank::Rank6
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_core::{MoveList, PromotionPiece, generate_captures};

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    fn pv_config() -> OrderingConfig {
        OrderingConfig {
            passer_sacrifices: true,
            king_attack_sacrifices: true,
            king_box_sacrifices: true,
            pv_queen_promotions: true,
            quiet_king_attacks: false,
        }
    }

    #[test]
    fn en_passant_is_always_good() {
        let b = board("4k3/2p5/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep = Move::new_en_passant(Square::E5, Square::D6);
        assert!(capture_is_good(&b, ep, false, &OrderingConfig::DEFAULT));
    }

    #[test]
    fn under_promotions_are_always_bad() {
        let b = board("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let config = pv_config();
        let mut list = MoveList::new();
        generate_captures(&b, &mut list);
        let mut seen = 0;
        for &mv in &list {
            if mv.is_under_promotion() {
                seen += 1;
                assert!(!capture_is_good(&b, mv, true, &config), "{mv}");
            }
        }
        assert_eq!(seen, 6);
        let axb8q = Move::new_promotion(Square::A7, Square::B8, PromotionPiece::Queen);
        assert!(capture_is_good(&b, axb8q, false, &OrderingConfig::DEFAULT));
    }

    #[test]
    fn bigger_victim_is_good_without_see() {
        // Pawn takes a defended rook.
        let b = board("4k3/8/4p3/3r4/4P3/8/8/4K3 w - - 0 1");
        let exd5 = Move::new(Square::E4, Square::D5);
        assert!(capture_is_good(&b, exd5, false, &OrderingConfig::DEFAULT));
    }

    #[test]
    fn losing_capture_is_bad() {
        let b = board("4k3/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1");
        let qxc5 = Move::new(Square::E3, Square::C5);
        assert!(!capture_is_good(&b, qxc5, false, &OrderingConfig::DEFAULT));
        // Losing a queen is past every sacrifice margin.
        assert!(!capture_is_good(&b, qxc5, true, &pv_config()));
    }

    #[test]
    fn knight_for_pawn_is_bad() {
        let b = board("4k3/8/2p5/3p4/8/4N3/8/4K3 w - - 0 1");
        let nxd5 = Move::new(Square::E3, Square::D5);
        assert_eq!(see(&b, nxd5), -220);
        assert!(!capture_is_good(&b, nxd5, false, &OrderingConfig::DEFAULT));
    }

    #[test]
    fn passer_sacrifice_only_in_pv() {
        // Knight takes a pawn on black's sixth rank, defended by e4.
        let b = board("4k3/8/8/8/4p3/3p4/8/2N1K3 w - - 0 1");
        let nxd3 = Move::new(Square::C1, Square::D3);
        assert_eq!(see(&b, nxd3), -220);
        assert!(!capture_is_good(&b, nxd3, false, &OrderingConfig::DEFAULT));
        assert!(capture_is_good(&b, nxd3, true, &OrderingConfig::DEFAULT));

        let off = OrderingConfig { passer_sacrifices: false, ..OrderingConfig::DEFAULT };
        assert!(!capture_is_good(&b, nxd3, true, &off));
    }

    #[test]
    fn king_box_sacrifice() {
        // Knight takes f7, defended by the king next to it.
        let b = board("6k1/5p2/8/6N1/8/8/8/4K3 w - - 0 1");
        let nxf7 = Move::new(Square::G5, Square::F7);
        assert_eq!(see(&b, nxf7), -220);
        assert!(!capture_is_good(&b, nxf7, true, &OrderingConfig::DEFAULT));

        let attack = OrderingConfig { king_attack_sacrifices: true, ..OrderingConfig::DEFAULT };
        assert!(!capture_is_good(&b, nxf7, true, &attack));
        let boxed = OrderingConfig { king_box_sacrifices: true, ..OrderingConfig::DEFAULT };
        assert!(capture_is_good(&b, nxf7, true, &boxed));
        assert!(!capture_is_good(&b, nxf7, false, &boxed));
    }

    #[test]
    fn king_attack_sacrifice() {
        // Knight takes e7 with check, the bishop recaptures.
        let b = board("3b2k1/4p3/8/3N4/8/8/8/4K3 w - - 0 1");
        let nxe7 = Move::new(Square::D5, Square::E7);
        assert_eq!(see(&b, nxe7), -220);
        assert!(!capture_is_good(&b, nxe7, true, &OrderingConfig::DEFAULT));

        let boxed = OrderingConfig { king_box_sacrifices: true, ..OrderingConfig::DEFAULT };
        assert!(!capture_is_good(&b, nxe7, true, &boxed));
        let attack = OrderingConfig { king_attack_sacrifices: true, ..OrderingConfig::DEFAULT };
        assert!(capture_is_good(&b, nxe7, true, &attack));
    }

    #[test]
    fn queen_promotion_carve_out() {
        // Quiet queen promotion onto a square the rook covers.
        let b = board("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let b8q = Move::new_promotion(Square::B7, Square::B8, PromotionPiece::Queen);
        assert_eq!(see(&b, b8q), -100);
        assert!(!capture_is_good(&b, b8q, true, &OrderingConfig::DEFAULT));
        let config = OrderingConfig { pv_queen_promotions: true, ..OrderingConfig::DEFAULT };
        assert!(capture_is_good(&b, b8q, true, &config));
        assert!(!capture_is_good(&b, b8q, false, &config));
    }

    #[test]
    fn king_attack_from_destination() {
        let b = board("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1");
        assert!(piece_attacks_enemy_king(&b, Move::new(Square::E2, Square::E7)));
        assert!(!piece_attacks_enemy_king(&b, Move::new(Square::E2, Square::D2)));
        // The promoted piece is the attacker.
        let p = board("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let b8q = Move::new_promotion(Square::B7, Square::B8, PromotionPiece::Queen);
        let b8n = Move::new_promotion(Square::B7, Square::B8, PromotionPiece::Knight);
        assert!(piece_attacks_enemy_king(&p, b8q));
        assert!(!piece_attacks_enemy_king(&p, b8n));
    }
}
