//! Castling rights as a four-bit set.

use std::fmt;

use crate::error::FenError;

/// Bits in FEN order: `K`, `Q`, `k`, `q`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

const FEN_LETTERS: [char; 4] = ['K', 'Q', 'k', 'q'];

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);
    pub const WHITE_BOTH: CastleRights = CastleRights(0b0011);
    pub const BLACK_BOTH: CastleRights = CastleRights(0b1100);

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every right in `other` is present.
    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// Parse the FEN castling field (`KQkq`, `Kq`, `-`, ...).
    pub fn from_fen(field: &str) -> Result<CastleRights, FenError> {
        if field == "-" {
            return Ok(CastleRights::NONE);
        }
        field.chars().try_fold(CastleRights::NONE, |rights, c| {
            FEN_LETTERS
                .iter()
                .position(|&letter| letter == c)
                .map(|bit| rights.insert(CastleRights(1 << bit)))
                .ok_or(FenError::InvalidCastlingChar { character: c })
        })
    }

    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        FEN_LETTERS
            .iter()
            .enumerate()
            .filter(|&(bit, _)| (self.0 >> bit) & 1 == 1)
            .map(|(_, &letter)| letter)
            .collect()
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({})", self.to_fen())
    }
}
