//! Position state: bitboards per kind and per side, a square-indexed
//! mailbox, and the FEN scalar fields.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::error::BoardError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::{File, Rank, Square};

/// A chess position. `Copy`, so making a move produces a new board.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pieces: [Bitboard; PieceKind::COUNT],
    sides: [Bitboard; Color::COUNT],
    mailbox: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl Board {
    /// No pieces, white to move, no rights.
    pub(crate) fn empty() -> Board {
        Board {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            mailbox: [None; Square::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn starting_position() -> Board {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
            board.toggle_piece(Square::new(Rank::Rank1, file), kind, Color::White);
            board.toggle_piece(Square::new(Rank::Rank2, file), PieceKind::Pawn, Color::White);
            board.toggle_piece(Square::new(Rank::Rank7, file), PieceKind::Pawn, Color::Black);
            board.toggle_piece(Square::new(Rank::Rank8, file), kind, Color::Black);
        }
        board.castling = CastleRights::ALL;
        board
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        self.mailbox[sq.index()].map(Piece::kind)
    }

    #[inline]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.mailbox[sq.index()].map(Piece::color)
    }

    #[inline]
    pub fn colored_piece_on(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index()]
    }

    /// Pieces of `kind`, both colors.
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    #[inline]
    pub fn colored_pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces(kind) & self.side(color)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[0] | self.sides[1]
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.mailbox[sq.index()].is_some()
    }

    /// Square of `color`'s king. Every board that passed [`Board::validate`]
    /// has exactly one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.colored_pieces(PieceKind::King, color);
        debug_assert_eq!(kings.count(), 1, "{color} has {} kings", kings.count());
        Square::from_index_unchecked(kings.inner().trailing_zeros().min(63) as u8)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Add the piece if `sq` is empty, remove it if it stands there.
    #[inline]
    pub(crate) fn toggle_piece(&mut self, sq: Square, kind: PieceKind, color: Color) {
        let bit = sq.bitboard();
        self.pieces[kind.index()] ^= bit;
        self.sides[color.index()] ^= bit;
        let piece = Piece::new(kind, color);
        let slot = &mut self.mailbox[sq.index()];
        debug_assert!(slot.is_none() || *slot == Some(piece), "toggle {piece:?} over {slot:?} on {sq}");
        *slot = if slot.is_some() { None } else { Some(piece) };
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn set_halfmove_clock(&mut self, clock: u16) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub(crate) fn set_fullmove_number(&mut self, number: u16) {
        self.fullmove_number = number;
    }

    /// Reject positions the move generator cannot work with.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self.colored_pieces(PieceKind::King, color).count();
            if count != 1 {
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }

        let back_ranks = Bitboard::rank(Rank::Rank1) | Bitboard::rank(Rank::Rank8);
        if (self.pieces(PieceKind::Pawn) & back_ranks).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        if let Some(sq) = self.en_passant {
            if sq.rank().relative_to(self.side_to_move) != Rank::Rank6 {
                return Err(BoardError::InvalidEnPassant { square: sq });
            }
        }
        Ok(())
    }

    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}

/// 8x8 text diagram of a board, rank 8 on top.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let row: Vec<String> = File::ALL
                .into_iter()
                .map(|file| {
                    let piece = self.0.colored_piece_on(Square::new(rank, file));
                    piece.map_or('.', Piece::fen_char).to_string()
                })
                .collect();
            writeln!(f, "{rank}  {}", row.join(" "))?;
        }
        write!(f, "   a b c d e f g h")
    }
}
