//! Files, ranks, and squares. Square index is `rank * 8 + file`, so a1 is 0
//! and h8 is 63.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::piece::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    FileA = 0,
    FileB = 1,
    FileC = 2,
    FileD = 3,
    FileE = 4,
    FileF = 5,
    FileG = 6,
    FileH = 7,
}

impl File {
    pub const ALL: [File; 8] = [
        File::FileA,
        File::FileB,
        File::FileC,
        File::FileD,
        File::FileE,
        File::FileF,
        File::FileG,
        File::FileH,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<File> {
        if index < 8 { Some(File::ALL[index as usize]) } else { None }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'a' + self.index() as u8) as char)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Rank1 = 0,
    Rank2 = 1,
    Rank3 = 2,
    Rank4 = 3,
    Rank5 = 4,
    Rank6 = 5,
    Rank7 = 6,
    Rank8 = 7,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Rank1,
        Rank::Rank2,
        Rank::Rank3,
        Rank::Rank4,
        Rank::Rank5,
        Rank::Rank6,
        Rank::Rank7,
        Rank::Rank8,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Rank> {
        if index < 8 { Some(Rank::ALL[index as usize]) } else { None }
    }

    /// The rank as seen from `color`'s side: a black pawn on `Rank3` is on
    /// its sixth rank.
    #[inline]
    pub const fn relative_to(self, color: Color) -> Rank {
        match color {
            Color::White => self,
            Color::Black => Rank::ALL[7 - self.index()],
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

macro_rules! rank_of_squares {
    (@each $index:expr;) => {};
    (@each $index:expr; $name:ident $($rest:ident)*) => {
        pub const $name: Square = Square($index);
        rank_of_squares!(@each $index + 1; $($rest)*);
    };
    ($first:literal: $($name:ident)*) => {
        rank_of_squares!(@each $first; $($name)*);
    };
}

impl Square {
    pub const COUNT: usize = 64;

    rank_of_squares!(0: A1 B1 C1 D1 E1 F1 G1 H1);
    rank_of_squares!(8: A2 B2 C2 D2 E2 F2 G2 H2);
    rank_of_squares!(16: A3 B3 C3 D3 E3 F3 G3 H3);
    rank_of_squares!(24: A4 B4 C4 D4 E4 F4 G4 H4);
    rank_of_squares!(32: A5 B5 C5 D5 E5 F5 G5 H5);
    rank_of_squares!(40: A6 B6 C6 D6 E6 F6 G6 H6);
    rank_of_squares!(48: A7 B7 C7 D7 E7 F7 G7 H7);
    rank_of_squares!(56: A8 B8 C8 D8 E8 F8 G8 H8);

    #[inline]
    pub const fn new(rank: Rank, file: File) -> Square {
        Square((rank as u8) << 3 | file as u8)
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    /// Parse a square name such as `e4`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        match s.as_bytes() {
            &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some(Square::new(
                Rank::ALL[(rank - b'1') as usize],
                File::ALL[(file - b'a') as usize],
            )),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1 << self.0)
    }

    /// Chebyshev distance: the number of king steps between the squares.
    #[inline]
    pub const fn distance(self, other: Square) -> u8 {
        let files = (self.0 & 7).abs_diff(other.0 & 7);
        let ranks = (self.0 >> 3).abs_diff(other.0 >> 3);
        if files > ranks { files } else { ranks }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..Square::COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
