//! Fixed-capacity list of moves with attached ordering scores.

use ordo_core::{MAX_MOVES, Move, MoveList};

/// Moves paired with scores, sorted in place by descending score.
///
/// Sorting is stable: moves with equal scores keep generation order.
#[derive(Clone)]
pub struct ScoredMoveList {
    moves: [Move; MAX_MOVES],
    scores: [i32; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_MOVES],
            scores: [0; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append `mv` with its ordering score.
    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.scores[self.len] = score;
        self.len += 1;
    }

    /// Replace the contents with `moves`, scoring each one with `score`.
    pub fn fill(&mut self, moves: &MoveList, mut score: impl FnMut(Move) -> i32) {
        self.clear();
        for &mv in moves {
            self.push(mv, score(mv));
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Move {
        self.moves[..self.len][index]
    }

    #[inline]
    pub fn score(&self, index: usize) -> i32 {
        self.scores[..self.len][index]
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn copy_from(&mut self, other: &ScoredMoveList) {
        self.moves[..other.len].copy_from_slice(&other.moves[..other.len]);
        self.scores[..other.len].copy_from_slice(&other.scores[..other.len]);
        self.len = other.len;
    }

    /// Stable insertion sort, highest score first.
    ///
    /// Stage lists are short and often nearly ordered, which suits insertion sort.
    pub fn sort(&mut self) {
        for i in 1..self.len {
            let (mv, score) = (self.moves[i], self.scores[i]);
            let mut j = i;
            while j > 0 && self.scores[j - 1] < score {
                self.moves[j] = self.moves[j - 1];
                self.scores[j] = self.scores[j - 1];
                j -= 1;
            }
            self.moves[j] = mv;
            self.scores[j] = score;
        }
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScoredMoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.moves().iter().zip(&self.scores[..self.len]))
            .finish()
    }
}
