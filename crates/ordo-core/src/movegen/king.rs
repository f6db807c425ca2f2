//! King move and castling generation.

use crate::attacks::king_attacks;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

use super::MoveList;
use super::is_attacked;

/// One castling option: required right, king and rook squares, squares that
/// must be empty, and squares the king crosses (must not be attacked).
struct Castle {
    right: CastleRights,
    king: Square,
    rook: Square,
    dest: Square,
    empty: [Option<Square>; 3],
    crossed: [Square; 2],
}

const WHITE_CASTLES: [Castle; 2] = [
    Castle {
        right: CastleRights::WHITE_KING,
        king: Square::E1,
        rook: Square::H1,
        dest: Square::G1,
        empty: [Some(Square::F1), Some(Square::G1), None],
        crossed: [Square::F1, Square::G1],
    },
    Castle {
        right: CastleRights::WHITE_QUEEN,
        king: Square::E1,
        rook: Square::A1,
        dest: Square::C1,
        empty: [Some(Square::B1), Some(Square::C1), Some(Square::D1)],
        crossed: [Square::C1, Square::D1],
    },
];

const BLACK_CASTLES: [Castle; 2] = [
    Castle {
        right: CastleRights::BLACK_KING,
        king: Square::E8,
        rook: Square::H8,
        dest: Square::G8,
        empty: [Some(Square::F8), Some(Square::G8), None],
        crossed: [Square::F8, Square::G8],
    },
    Castle {
        right: CastleRights::BLACK_QUEEN,
        king: Square::E8,
        rook: Square::A8,
        dest: Square::C8,
        empty: [Some(Square::B8), Some(Square::C8), Some(Square::D8)],
        crossed: [Square::C8, Square::D8],
    },
];

/// Generate legal king moves (normal moves + castling).
pub(super) fn gen_king(board: &Board, king_sq: Square, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    // Sliders see through the king so it cannot retreat along a checking ray.
    let without_king = board.occupied().without(king_sq);

    for dst in king_attacks(king_sq) & !board.side(us) {
        if !is_attacked(board, dst, them, without_king) {
            list.push(Move::new(king_sq, dst));
        }
    }

    let occupied = board.occupied();
    if is_attacked(board, king_sq, them, occupied) {
        return;
    }

    let options = match us {
        Color::White => &WHITE_CASTLES,
        Color::Black => &BLACK_CASTLES,
    };
    let rooks = board.colored_pieces(PieceKind::Rook, us);
    for castle in options {
        // Rights from a hand-written FEN need not match the pieces.
        let in_place = king_sq == castle.king && rooks.contains(castle.rook);
        if !in_place || !board.castling().contains(castle.right) {
            continue;
        }
        let path = castle
            .empty
            .iter()
            .flatten()
            .fold(Bitboard::EMPTY, |bb, &sq| bb.with(sq));
        if (path & occupied).is_nonempty() {
            continue;
        }
        if castle.crossed.iter().any(|&sq| is_attacked(board, sq, them, occupied)) {
            continue;
        }
        list.push(Move::new_castle(king_sq, castle.dest));
    }
}
