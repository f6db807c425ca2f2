//! Attack sets for every piece type.

mod rays;

use crate::bitboard::Bitboard;
use crate::piece::Color;
use crate::square::Square;

use self::rays::{
    BETWEEN, BISHOP_DIRECTIONS, KING_ATTACKS, KNIGHT_ATTACKS, LINE, PAWN_ATTACKS, ROOK_DIRECTIONS,
    slider_attacks,
};

/// Return the squares a knight on `sq` attacks.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

/// Return the squares a king on `sq` attacks.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Return the squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// Return rook attacks from `sq` given `occupied` squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(&ROOK_DIRECTIONS, sq.index(), occupied)
}

/// Return bishop attacks from `sq` given `occupied` squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(&BISHOP_DIRECTIONS, sq.index(), occupied)
}

/// Return queen attacks from `sq` given `occupied` squares.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Return squares strictly between `sq1` and `sq2` (exclusive of both endpoints).
///
/// Returns an empty bitboard if the two squares are not on the same rank, file,
/// or diagonal.
#[inline]
pub fn between(sq1: Square, sq2: Square) -> Bitboard {
    BETWEEN[sq1.index()][sq2.index()]
}

/// Return all squares on the line through `sq1` and `sq2`, including both endpoints
/// and extending to the board edges.
///
/// Returns an empty bitboard if the two squares are not on the same rank, file,
/// or diagonal.
#[inline]
pub fn line(sq1: Square, sq2: Square) -> Bitboard {
    LINE[sq1.index()][sq2.index()]
}
