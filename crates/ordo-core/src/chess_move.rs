//! Moves packed into 16 bits.

use std::fmt;

use crate::board::Board;
use crate::movegen::generate_legal_moves;
use crate::piece::PieceKind;
use crate::square::Square;

/// What a move does beyond moving one piece from source to destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Promotion,
    EnPassant,
    Castling,
}

/// Piece a pawn turns into, in ascending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

const PROMOTION_LETTERS: [char; 4] = ['n', 'b', 'r', 'q'];

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Knight,
        PromotionPiece::Bishop,
        PromotionPiece::Rook,
        PromotionPiece::Queen,
    ];

    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Knight => PieceKind::Knight,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Queen => PieceKind::Queen,
        }
    }

    fn letter(self) -> char {
        PROMOTION_LETTERS[self as usize]
    }

    fn from_letter(c: char) -> Option<PromotionPiece> {
        let index = PROMOTION_LETTERS.iter().position(|&l| l == c)?;
        Some(PromotionPiece::ALL[index])
    }
}

// Flag nibble in bits 12..16. Promotions set the high bit and keep the
// promoted piece in the low two.
const FLAG_CASTLE: u16 = 1;
const FLAG_EN_PASSANT: u16 = 2;
const FLAG_PROMOTION: u16 = 8;

/// Source in bits 0..6, destination in bits 6..12, flags above.
///
/// The all-zero word is [`Move::NULL`], which no legal move encodes since
/// its source and destination coincide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    pub const NULL: Move = Move(0);

    const fn encode(source: Square, dest: Square, flags: u16) -> Move {
        Move(source.index() as u16 | (dest.index() as u16) << 6 | flags << 12)
    }

    /// A plain move or capture.
    pub const fn new(source: Square, dest: Square) -> Move {
        Move::encode(source, dest, 0)
    }

    pub const fn new_promotion(source: Square, dest: Square, promo: PromotionPiece) -> Move {
        Move::encode(source, dest, FLAG_PROMOTION | promo as u16)
    }

    pub const fn new_en_passant(source: Square, dest: Square) -> Move {
        Move::encode(source, dest, FLAG_EN_PASSANT)
    }

    /// Castling, written as the king's two squares.
    pub const fn new_castle(king_source: Square, king_dest: Square) -> Move {
        Move::encode(king_source, king_dest, FLAG_CASTLE)
    }

    /// Look up the legal move spelled `uci` (`e2e4`, `a7a8q`) on `board`.
    ///
    /// The board supplies what the text cannot: castling and en passant
    /// flags. Malformed or illegal text gives `None`.
    pub fn from_uci(uci: &str, board: &Board) -> Option<Move> {
        let source = Square::from_algebraic(uci.get(0..2)?)?;
        let dest = Square::from_algebraic(uci.get(2..4)?)?;
        let mut rest = uci.get(4..)?.chars();
        let promo = rest.next().map(PromotionPiece::from_letter);
        if rest.next().is_some() {
            return None;
        }
        let promo = match promo {
            Some(parsed) => Some(parsed?),
            None => None,
        };

        generate_legal_moves(board).as_slice().iter().copied().find(|mv| {
            (mv.source(), mv.dest()) == (source, dest)
                && mv.is_promotion().then(|| mv.promotion_piece()) == promo
        })
    }

    #[inline]
    pub const fn source(self) -> Square {
        Square::from_index_unchecked((self.0 & 0x3f) as u8)
    }

    #[inline]
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked((self.0 >> 6 & 0x3f) as u8)
    }

    #[inline]
    const fn flags(self) -> u16 {
        self.0 >> 12
    }

    pub const fn kind(self) -> MoveKind {
        match self.flags() {
            0 => MoveKind::Normal,
            FLAG_CASTLE => MoveKind::Castling,
            FLAG_EN_PASSANT => MoveKind::EnPassant,
            _ => MoveKind::Promotion,
        }
    }

    /// Meaningless unless [`Move::is_promotion`].
    pub const fn promotion_piece(self) -> PromotionPiece {
        PromotionPiece::ALL[(self.flags() & 3) as usize]
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flags() & FLAG_PROMOTION != 0
    }

    /// Promotion to a knight, bishop or rook.
    #[inline]
    pub const fn is_under_promotion(self) -> bool {
        self.is_promotion() && self.flags() & 3 != PromotionPiece::Queen as u16
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags() == FLAG_EN_PASSANT
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flags() == FLAG_CASTLE
    }
}

/// UCI long algebraic notation; the null move prints as `0000`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.source(), self.dest())?;
        if self.is_promotion() {
            write!(f, "{}", self.promotion_piece().letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            MoveKind::Normal => write!(f, "Move({self})"),
            kind => write!(f, "Move({self}, {kind:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveKind, PromotionPiece};
    use crate::board::Board;
    use crate::square::Square;

    #[test]
    fn fits_in_a_u16() {
        assert_eq!(std::mem::size_of::<Move>(), 2);
    }

    #[test]
    fn encoding_keeps_every_field() {
        let mv = Move::new_promotion(Square::B7, Square::A8, PromotionPiece::Rook);
        assert_eq!((mv.source(), mv.dest()), (Square::B7, Square::A8));
        assert_eq!(mv.kind(), MoveKind::Promotion);
        assert_eq!(mv.promotion_piece(), PromotionPiece::Rook);

        let castle = Move::new_castle(Square::E8, Square::C8);
        assert_eq!(castle.kind(), MoveKind::Castling);
        assert!(castle.is_castle() && !castle.is_promotion());

        let ep = Move::new_en_passant(Square::E5, Square::D6);
        assert_eq!(ep.kind(), MoveKind::EnPassant);
        assert_eq!(Move::new(Square::H8, Square::H1).kind(), MoveKind::Normal);
        assert_ne!(Move::new(Square::A2, Square::A1), Move::NULL);
    }

    #[test]
    fn under_promotions_exclude_the_queen() {
        for promo in PromotionPiece::ALL {
            let mv = Move::new_promotion(Square::E7, Square::E8, promo);
            assert_eq!(mv.is_under_promotion(), promo != PromotionPiece::Queen, "{promo:?}");
        }
        assert!(!Move::new(Square::E2, Square::E4).is_under_promotion());
    }

    #[test]
    fn display_is_uci() {
        assert_eq!(Move::NULL.to_string(), "0000");
        assert_eq!(Move::new(Square::G1, Square::F3).to_string(), "g1f3");
        let promo = Move::new_promotion(Square::E7, Square::E8, PromotionPiece::Knight);
        assert_eq!(promo.to_string(), "e7e8n");
        assert_eq!(format!("{promo:?}"), "Move(e7e8n, Promotion)");
    }

    #[test]
    fn from_uci_takes_flags_from_the_position() {
        let board: Board = "r3k3/1P6/8/3pP3/8/8/8/4K2R w Kq d6 0 1".parse().unwrap();
        assert_eq!(
            Move::from_uci("e1g1", &board),
            Some(Move::new_castle(Square::E1, Square::G1))
        );
        assert_eq!(
            Move::from_uci("e5d6", &board),
            Some(Move::new_en_passant(Square::E5, Square::D6))
        );
        assert_eq!(
            Move::from_uci("b7a8q", &board),
            Some(Move::new_promotion(Square::B7, Square::A8, PromotionPiece::Queen))
        );
        assert_eq!(Move::from_uci("b7a8", &board), None);
    }

    #[test]
    fn from_uci_rejects_bad_input() {
        let board = Board::starting_position();
        for text in ["e2e5", "e2", "e2e4x", "z9e4", "e2e4qq", "é2e4"] {
            assert_eq!(Move::from_uci(text, &board), None, "{text}");
        }
    }
}
