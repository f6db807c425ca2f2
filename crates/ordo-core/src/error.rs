//! Error types for FEN parsing and board validation.

use crate::piece::Color;
use crate::square::Square;

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN string has neither 4 nor 6 space-separated fields.
    #[error("expected 4 or 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    /// A rank describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index (0 = rank 8 in FEN, 7 = rank 1).
        rank_index: usize,
        length: usize,
    },
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },
    /// A move counter (halfmove clock or fullmove number) is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },
    /// The parsed board fails structural validation.
    #[error("invalid board: {source}")]
    InvalidBoard {
        #[from]
        source: BoardError,
    },
}

/// Errors from structural validation of a [`Board`](crate::board::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A side does not have exactly one king.
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: Color, count: u32 },
    #[error("pawns found on back rank")]
    PawnsOnBackRank,
    /// The en passant square is not behind a pawn that just moved two ranks.
    #[error("en passant square {square} is on the wrong rank")]
    InvalidEnPassant { square: Square },
}
