//! Move-shape and admission predicates used by move ordering.
//!
//! Moves checked here may come from outside the generator (hash tables,
//! killer slots, user input), so every query tolerates arbitrary input.

use crate::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{Move, MoveKind};
use crate::movegen::generate_legal_moves;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::{Rank, Square};

impl Board {
    /// Pieces of both colors attacking `sq`, sliders cast through
    /// `occupied` instead of the board's own occupancy.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let queens = self.pieces(PieceKind::Queen);
        let pawns = self.pieces(PieceKind::Pawn);
        let white_pawns = pawn_attacks(Color::Black, sq) & pawns & self.side(Color::White);
        let black_pawns = pawn_attacks(Color::White, sq) & pawns & self.side(Color::Black);

        white_pawns
            | black_pawns
            | knight_attacks(sq) & self.pieces(PieceKind::Knight)
            | king_attacks(sq) & self.pieces(PieceKind::King)
            | bishop_attacks(sq, occupied) & (self.pieces(PieceKind::Bishop) | queens)
            | rook_attacks(sq, occupied) & (self.pieces(PieceKind::Rook) | queens)
    }

    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        (self.attackers_to(sq, self.occupied()) & self.side(by)).is_nonempty()
    }

    pub fn in_check(&self) -> bool {
        let us = self.side_to_move();
        self.is_square_attacked(self.king_square(us), !us)
    }

    /// Return the piece standing on the move's source square.
    pub fn moving_piece(&self, mv: Move) -> Option<Piece> {
        self.colored_piece_on(mv.source())
    }

    /// Return the kind of piece removed by `mv`, if it captures.
    pub fn captured_piece(&self, mv: Move) -> Option<PieceKind> {
        if mv.is_en_passant() {
            return Some(PieceKind::Pawn);
        }
        if mv.is_castle() || self.color_on(mv.dest()) != Some(self.side_to_move().flip()) {
            return None;
        }
        self.piece_on(mv.dest())
    }

    pub fn is_capture(&self, mv: Move) -> bool {
        self.captured_piece(mv).is_some()
    }

    /// Return `true` for captures and promotions.
    pub fn is_tactical(&self, mv: Move) -> bool {
        mv.is_promotion() || self.is_capture(mv)
    }

    /// Return `true` if playing `mv` leaves the opponent in check.
    pub fn gives_check(&self, mv: Move) -> bool {
        self.make_move(mv).in_check()
    }

    /// Return `true` if `mv` has the shape of a move the side to move could
    /// make here, ignoring whether it leaves the king attacked.
    ///
    /// Used to vet hash and killer moves recorded in other positions.
    /// Castling is rare enough to be checked against the legal generator.
    pub fn is_pseudo_move(&self, mv: Move) -> bool {
        let us = self.side_to_move();
        let (from, to) = (mv.source(), mv.dest());
        let Some(kind) = self.piece_on(from) else {
            return false;
        };
        if mv.is_null() || self.color_on(from) != Some(us) || self.color_on(to) == Some(us) {
            return false;
        }
        if self.piece_on(to) == Some(PieceKind::King) {
            return false;
        }
        if mv.is_castle() {
            return kind == PieceKind::King && generate_legal_moves(self).contains(mv);
        }
        if kind == PieceKind::Pawn {
            return self.is_pawn_shape(mv);
        }
        if mv.kind() != MoveKind::Normal {
            return false;
        }

        let occupied = self.occupied();
        let reach = match kind {
            PieceKind::Knight => knight_attacks(from),
            PieceKind::Bishop => bishop_attacks(from, occupied),
            PieceKind::Rook => rook_attacks(from, occupied),
            PieceKind::Queen => queen_attacks(from, occupied),
            PieceKind::King => king_attacks(from),
            PieceKind::Pawn => Bitboard::EMPTY,
        };
        reach.contains(to)
    }

    fn is_pawn_shape(&self, mv: Move) -> bool {
        let us = self.side_to_move();
        let (from, to) = (mv.source(), mv.dest());
        let last_rank = Rank::Rank8.relative_to(us);
        if mv.is_en_passant() {
            return self.en_passant() == Some(to) && pawn_attacks(us, from).contains(to);
        }
        if mv.is_promotion() != (to.rank() == last_rank) {
            return false;
        }

        if pawn_attacks(us, from).contains(to) {
            return self.color_on(to) == Some(!us);
        }
        if to.file() != from.file() || self.is_occupied(to) {
            return false;
        }
        let rank_from = from.rank().relative_to(us).index();
        let rank_to = to.rank().relative_to(us).index();
        let double_push = rank_from == 1
            && rank_to == 3
            && !self.is_occupied(Square::new(Rank::Rank3.relative_to(us), from.file()));
        rank_to == rank_from + 1 || double_push
    }

    /// Like [`Board::is_pseudo_move`], restricted to non-tactical moves.
    pub fn is_quiet_pseudo_move(&self, mv: Move) -> bool {
        !self.is_tactical(mv) && self.is_pseudo_move(mv)
    }

    /// Return `true` if `mv` does not leave the mover's own king attacked.
    ///
    /// `mv` must already have passed [`Board::is_pseudo_move`] or come from a generator.
    pub fn is_legal_pseudo_move(&self, mv: Move) -> bool {
        let us = self.side_to_move();
        let after = self.make_move(mv);
        !after.is_square_attacked(after.king_square(us), us.flip())
    }
}
