//! Core chess types for ordo: board representation, copy-make, legal move
//! generation, and the move queries the ordering layer is built on.

mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod error;
mod fen;
mod make_move;
mod move_query;
mod movegen;
mod piece;
mod square;

pub use attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, queen_attacks,
    rook_attacks,
};
pub use bitboard::Bitboard;
pub use board::{Board, PrettyBoard};
pub use castle_rights::CastleRights;
pub use chess_move::{Move, MoveKind, PromotionPiece};
pub use error::{BoardError, FenError};
pub use fen::STARTING_FEN;
pub use movegen::{
    AttackInfo, MAX_MOVES, MoveList, generate_captures, generate_legal_evasions, generate_legal_moves,
    generate_pseudo_evasions, generate_quiet_checks, generate_quiet_moves,
};
pub use piece::{Color, Piece, PieceKind};
pub use square::{File, Rank, Square};
