//! Legal move generation and the stage generators built on top of it.
//!
//! Every generator here emits only legal moves. The stage generators
//! (captures, quiets, evasions, quiet checks) partition the full legal list
//! by move shape, so their union over a position is exactly the legal set.

mod king;
mod pieces;
mod pins;

use crate::attacks::between;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::Color;
use crate::square::Square;

use self::king::gen_king;
use self::pieces::{Constraints, gen_pawns, gen_pieces};
use self::pins::compute_checkers_and_pinned;

/// Capacity of a [`MoveList`]; covers the theoretical maximum of 218.
pub const MAX_MOVES: usize = 256;

/// Stack-allocated buffer for generated moves.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: u16,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// Keep only the moves for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut kept = 0;
        for i in 0..self.len as usize {
            let mv = self.moves[i];
            if keep(mv) {
                self.moves[kept] = mv;
                kept += 1;
            }
        }
        self.len = kept as u16;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Check and pin state of the side to move, computed once per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackInfo {
    /// Enemy pieces giving check to our king.
    pub checkers: Bitboard,
    /// Our pieces pinned to our king.
    pub pinned: Bitboard,
}

impl AttackInfo {
    pub fn new(board: &Board) -> AttackInfo {
        let (checkers, pinned) = compute_checkers_and_pinned(board);
        AttackInfo { checkers, pinned }
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers.is_nonempty()
    }
}

fn is_attacked(board: &Board, sq: Square, by_color: Color, occupied: Bitboard) -> bool {
    (board.attackers_to(sq, occupied) & board.side(by_color) & occupied).is_nonempty()
}

fn fill_legal(board: &Board, info: &AttackInfo, list: &mut MoveList) {
    let king = board.king_square(board.side_to_move());
    let mask = match (info.checkers.count(), info.checkers.lsb()) {
        (0, _) => Bitboard::FULL,
        // Capture the checker or block the line to it.
        (1, Some(checker)) => between(king, checker) | info.checkers,
        _ => Bitboard::EMPTY,
    };
    if mask.is_nonempty() {
        let constraints = Constraints {
            king,
            pinned: info.pinned,
            mask,
        };
        gen_pawns(board, &constraints, list);
        gen_pieces(board, &constraints, list);
    }
    gen_king(board, king, list);
}

/// Generate all legal moves for the current position.
pub fn generate_legal_moves(board: &Board) -> MoveList {
    let mut list = MoveList::new();
    fill_legal(board, &AttackInfo::new(board), &mut list);
    list
}

/// Fill `list` with every tactical move: captures, en passant, and all promotions.
pub fn generate_captures(board: &Board, list: &mut MoveList) {
    list.clear();
    fill_legal(board, &AttackInfo::new(board), list);
    list.retain(|mv| board.is_tactical(mv));
}

/// Fill `list` with every non-tactical move, castling included.
pub fn generate_quiet_moves(board: &Board, list: &mut MoveList) {
    list.clear();
    fill_legal(board, &AttackInfo::new(board), list);
    list.retain(|mv| !board.is_tactical(mv));
}

/// Fill `list` with every legal reply to a check.
pub fn generate_legal_evasions(board: &Board, info: &AttackInfo, list: &mut MoveList) {
    debug_assert!(info.in_check(), "evasions requested outside of check");
    list.clear();
    fill_legal(board, info, list);
}

/// Fill `list` with the evasion candidates used by quiescence search.
///
/// The underlying generator is legal, so this is the same set as
/// [`generate_legal_evasions`]; callers still run their legality filter.
pub fn generate_pseudo_evasions(board: &Board, info: &AttackInfo, list: &mut MoveList) {
    generate_legal_evasions(board, info, list);
}

/// Fill `list` with non-tactical moves that give check.
pub fn generate_quiet_checks(board: &Board, list: &mut MoveList) {
    generate_quiet_moves(board, list);
    list.retain(|mv| board.gives_check(mv));
}
