//! FEN string parsing and serialization for [`Board`].
//!
//! The two move counters are optional on input (EPD-style records carry
//! only four fields) and default to `0 1`.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::error::FenError;
use crate::piece::{Color, Piece};
use crate::square::{File, Rank, Square};

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Place the pieces of the first FEN field onto `board`, rank 8 first.
fn parse_placement(placement: &str, board: &mut Board) -> Result<(), FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::WrongRankCount { found: rows.len() });
    }

    for (rank_index, (row, rank)) in rows.iter().zip(Rank::ALL.into_iter().rev()).enumerate() {
        let mut file = 0usize;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            let Some(file_of) = u8::try_from(file).ok().and_then(File::from_index) else {
                return Err(FenError::BadRankLength { rank_index, length: file + 1 });
            };
            board.toggle_piece(Square::new(rank, file_of), piece.kind(), piece.color());
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadRankLength { rank_index, length: file });
        }
    }
    Ok(())
}

fn parse_counter(text: Option<&str>, field: &'static str, default: u16) -> Result<u16, FenError> {
    match text {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidMoveCounter {
            field,
            found: text.to_string(),
        }),
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let mut board = Board::empty();
        parse_placement(fields[0], &mut board)?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidColor { found: other.to_string() }),
        };

        let castling = CastleRights::from_fen(fields[2])?;

        let en_passant = match fields[3] {
            "-" => None,
            text => Some(
                Square::from_algebraic(text)
                    .ok_or_else(|| FenError::InvalidEnPassant { found: text.to_string() })?,
            ),
        };

        let halfmove_clock = parse_counter(fields.get(4).copied(), "halfmove clock", 0)?;
        let fullmove_number = parse_counter(fields.get(5).copied(), "fullmove number", 1)?;

        board.set_side_to_move(side_to_move);
        board.set_castling(castling);
        board.set_en_passant(en_passant);
        board.set_halfmove_clock(halfmove_clock);
        board.set_fullmove_number(fullmove_number);

        board.validate()?;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                let sq = Square::new(rank, file);
                match self.colored_piece_on(sq) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank != Rank::Rank1 {
                write!(f, "/")?;
            }
        }

        write!(f, " {} {}", self.side_to_move(), self.castling().to_fen())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::board::Board;
    use crate::error::FenError;

    #[test]
    fn display_roundtrips_parsed_positions() {
        for fen in [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            let board: Board = fen.parse().unwrap();
            assert_eq!(board.to_string(), fen);
        }
    }

    #[test]
    fn malformed_fields_are_rejected() {
        assert!(matches!(
            "e4 e5".parse::<Board>(),
            Err(FenError::WrongFieldCount { found: 2 })
        ));
        assert!(matches!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1".parse::<Board>(),
            Err(FenError::InvalidPieceChar { character: 'X' })
        ));
        assert!(matches!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1".parse::<Board>(),
            Err(FenError::InvalidColor { .. })
        ));
        assert!(matches!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1".parse::<Board>(),
            Err(FenError::InvalidEnPassant { .. })
        ));
    }

    #[test]
    fn counters_are_optional() {
        let board: Board = "4k3/8/8/8/8/8/8/4K3 b - -".parse().unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
        assert!(matches!(
            "4k3/8/8/8/8/8/8/4K3 b - - 0".parse::<Board>(),
            Err(FenError::WrongFieldCount { found: 5 })
        ));
    }

    #[test]
    fn structurally_invalid_boards_are_rejected() {
        for fen in [
            "8/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3KK3 w - - 0 1",
            "P3k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1",
        ] {
            assert!(
                matches!(fen.parse::<Board>(), Err(FenError::InvalidBoard { .. })),
                "{fen}"
            );
        }
    }
}
