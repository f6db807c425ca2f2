//! Piece colors, piece kinds, and colored pieces.

use std::fmt;
use std::ops::Not;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;
    pub const ALL: [Color; Color::COUNT] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

/// FEN side-to-move letter.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if *self == Color::White { "w" } else { "b" })
    }
}

/// Piece kind, ordered by increasing value with the king last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

const KIND_LETTERS: [char; PieceKind::COUNT] = ['p', 'n', 'b', 'r', 'q', 'k'];

impl PieceKind {
    pub const COUNT: usize = 6;
    pub const ALL: [PieceKind; PieceKind::COUNT] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase FEN letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        KIND_LETTERS[self.index()]
    }

    /// Case-insensitive inverse of [`PieceKind::fen_char`].
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        let lower = c.to_ascii_lowercase();
        KIND_LETTERS
            .iter()
            .position(|&letter| letter == lower)
            .map(|i| PieceKind::ALL[i])
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

/// A piece of a given color.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
}

impl Piece {
    pub const COUNT: usize = 12;

    pub const WHITE_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::White);
    pub const WHITE_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::White);
    pub const WHITE_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::White);
    pub const WHITE_KING: Piece = Piece::new(PieceKind::King, Color::White);
    pub const BLACK_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::Black);
    pub const BLACK_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::Black);
    pub const BLACK_KING: Piece = Piece::new(PieceKind::King, Color::Black);

    /// Every piece in [`Piece::index`] order.
    pub const ALL: [Piece; Piece::COUNT] = {
        let mut all = [Piece::WHITE_PAWN; Piece::COUNT];
        let mut i = 0;
        while i < Piece::COUNT {
            all[i] = Piece::new(PieceKind::ALL[i % 6], Color::ALL[i / 6]);
            i += 1;
        }
        all
    };

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// Uppercase letters are white, lowercase black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        PieceKind::from_fen_char(c).map(|kind| Piece::new(kind, color))
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Dense index: white pieces 0-5, black pieces 6-11, kind order within.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    pub fn fen_char(self) -> char {
        match self.color {
            Color::White => self.kind.fen_char().to_ascii_uppercase(),
            Color::Black => self.kind.fen_char(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.color, self.kind)
    }
}
