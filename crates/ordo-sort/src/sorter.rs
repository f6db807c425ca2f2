//! Staged move iterator.
//!
//! A [`SortContext`] walks one sequence of the stage program. Each stage is
//! generated, scored and sorted only when the previous one runs dry, and
//! every move is checked against the stage's [`Filter`] as it is served.
//! The context is plain state, so a search can keep one per node on every
//! thread and interleave calls freely.

use ordo_core::{
    AttackInfo, Board, Move, MoveList, generate_captures, generate_legal_evasions,
    generate_pseudo_evasions, generate_quiet_checks, generate_quiet_moves,
};

use crate::classify::capture_is_good;
use crate::config::OrderingConfig;
use crate::heuristics::{KillerTable, ThreadTables};
use crate::list::ScoredMoveList;
use crate::program::{Entry, Stage, initialize_tables};
use crate::score::{
    BAD_SCORE, HISTORY_BAD_CAPTURE, HISTORY_KILLER, HISTORY_MAX, KILLER_SCORE, TRANS_SCORE,
    history_prob, killer_value, move_value, move_value_simple, mvv_lva, quiet_score,
};
use crate::see::see_ge;

/// Admission test applied to each move as it is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Already fully filtered.
    None,
    Legal,
    /// Hash move: must be a real move here, then legal.
    TransKiller,
    /// Skip the hash move, defer bad captures, then legal.
    GoodCapture,
    BadCapture,
    /// Skip the hash move, require a quiet move shape, then legal.
    Killer,
    /// Skip the hash move and the killers, then legal.
    Quiet,
    /// Good captures only, then legal.
    CaptureQs,
    /// Non-losing checks only, then legal.
    CheckQs,
}

impl Filter {
    fn for_stage(stage: Stage) -> Filter {
        match stage {
            Stage::LegalEvasion | Stage::End => Filter::None,
            Stage::Trans => Filter::TransKiller,
            Stage::GoodCapture => Filter::GoodCapture,
            Stage::BadCapture => Filter::BadCapture,
            Stage::Killer => Filter::Killer,
            Stage::Quiet => Filter::Quiet,
            Stage::EvasionQs => Filter::Legal,
            Stage::CaptureQs => Filter::CaptureQs,
            Stage::CheckQs => Filter::CheckQs,
        }
    }
}

/// Collect the killer hints for `height` in tier order: both slots of this
/// height, then, above height 2, both slots two plies up. Duplicates are
/// blanked so the non-null entries are pairwise distinct.
pub fn killer_candidates(killers: &KillerTable, height: usize) -> [Move; 4] {
    let [k1, k2] = killers.get(height);
    let [k3, k4] = if height > 2 {
        killers.get(height - 2)
    } else {
        [Move::NULL; 2]
    };

    let mut candidates = [k1, k2, k3, k4];
    for i in 1..candidates.len() {
        if candidates[..i].contains(&candidates[i]) {
            candidates[i] = Move::NULL;
        }
    }
    candidates
}

/// Per-node iterator state.
pub struct SortContext<'b> {
    board: &'b Board,
    attack: &'b AttackInfo,
    height: usize,
    trans_killer: Move,
    killers: [Move; 4],
    in_pv: bool,
    config: OrderingConfig,
    pc: usize,
    stage: Stage,
    filter: Filter,
    list: ScoredMoveList,
    bad: ScoredMoveList,
    pos: usize,
    value: i32,
    score: i32,
    scratch: MoveList,
}

impl<'b> SortContext<'b> {
    fn empty(board: &'b Board, attack: &'b AttackInfo, entry: Entry) -> Self {
        Self {
            board,
            attack,
            height: 0,
            trans_killer: Move::NULL,
            killers: [Move::NULL; 4],
            in_pv: false,
            config: OrderingConfig::DEFAULT,
            pc: initialize_tables().entry(entry),
            stage: Stage::End,
            filter: Filter::None,
            list: ScoredMoveList::new(),
            bad: ScoredMoveList::new(),
            pos: 0,
            value: HISTORY_MAX as i32,
            score: 0,
            scratch: MoveList::new(),
        }
    }

    /// Start ordering a full-width node.
    ///
    /// In check, every legal evasion is generated, scored and sorted right
    /// away. Otherwise the main sequence starts and nothing is generated
    /// until the first [`SortContext::next_main`].
    pub fn init_main(
        board: &'b Board,
        attack: &'b AttackInfo,
        height: usize,
        trans_killer: Move,
        in_pv: bool,
        tables: &ThreadTables<'_>,
    ) -> Self {
        let entry = if attack.in_check() { Entry::LegalEvasion } else { Entry::Main };
        let mut ctx = Self::empty(board, attack, entry);
        ctx.height = height;
        ctx.trans_killer = trans_killer;
        ctx.killers = killer_candidates(tables.killers(), height);
        ctx.in_pv = in_pv;
        ctx.config = *tables.config();

        if entry == Entry::LegalEvasion {
            ctx.advance_main(tables);
        }
        ctx
    }

    /// Start ordering a quiescence node.
    ///
    /// In check all evasions are tried; otherwise captures, followed by
    /// quiet checks when `checks` is set.
    pub fn init_quiescence(board: &'b Board, attack: &'b AttackInfo, checks: bool) -> Self {
        let entry = if attack.in_check() {
            Entry::EvasionQs
        } else if checks {
            Entry::CheckQs
        } else {
            Entry::CaptureQs
        };
        Self::empty(board, attack, entry)
    }

    /// Next move to search, or `None` once every stage is exhausted.
    pub fn next_main(&mut self, tables: &ThreadTables<'_>) -> Option<Move> {
        loop {
            while self.pos < self.list.len() {
                let (mv, score) = (self.list.get(self.pos), self.list.score(self.pos));
                self.pos += 1;
                if let Some(value) = self.admit_main(mv, score, tables) {
                    self.value = value;
                    self.score = score;
                    return Some(mv);
                }
            }
            if !self.advance_main(tables) {
                return None;
            }
        }
    }

    /// Next quiescence move, or `None` once every stage is exhausted.
    pub fn next_quiescence(&mut self) -> Option<Move> {
        loop {
            while self.pos < self.list.len() {
                let (mv, score) = (self.list.get(self.pos), self.list.score(self.pos));
                self.pos += 1;
                if let Some(value) = self.admit_quiescence(mv) {
                    self.value = value;
                    self.score = score;
                    return Some(mv);
                }
            }
            if !self.advance_quiescence() {
                return None;
            }
        }
    }

    /// Telemetry value of the last served move.
    ///
    /// [`HISTORY_MAX`] unless the stage assigns its own: the success rate in
    /// the quiet stage, fixed values for killers and bad captures.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Ordering score the last served move was sorted by.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Stage that served the last move.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Admission filter of the current stage.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Node height the killers were read for.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Killer candidates in serving order, [`Move::NULL`] for empty tiers.
    pub fn killers(&self) -> [Move; 4] {
        self.killers
    }

    // ── Stage loading ────────────────────────────────────────────────────────

    /// Step the program counter and load the next stage. Returns `false`
    /// at the end of the sequence; the counter then stays on the terminator.
    fn advance_main(&mut self, tables: &ThreadTables<'_>) -> bool {
        let stage = self.next_stage();
        match stage {
            Stage::End => return false,
            Stage::LegalEvasion => {
                let (board, height, trans) = (self.board, self.height, self.trans_killer);
                generate_legal_evasions(board, self.attack, &mut self.scratch);
                self.list.fill(&self.scratch, |mv| {
                    move_value(board, mv, height, trans, tables.killers(), tables.history())
                });
                self.list.sort();
            }
            Stage::Trans => {
                self.list.clear();
                if !self.trans_killer.is_null() {
                    self.list.push(self.trans_killer, TRANS_SCORE);
                }
            }
            Stage::GoodCapture => {
                self.load_captures();
                self.bad.clear();
            }
            Stage::BadCapture => self.list.copy_from(&self.bad),
            Stage::Killer => {
                self.list.clear();
                for killer in self.killers {
                    if !killer.is_null() {
                        let score = killer_value(tables.killers(), self.height, killer);
                        self.list.push(killer, score.unwrap_or(KILLER_SCORE - 3));
                    }
                }
            }
            Stage::Quiet => {
                let (board, in_pv, config) = (self.board, self.in_pv, self.config);
                generate_quiet_moves(board, &mut self.scratch);
                self.list.fill(&self.scratch, |mv| {
                    quiet_score(board, mv, tables.history(), in_pv, &config)
                });
                self.list.sort();
            }
            Stage::EvasionQs | Stage::CaptureQs | Stage::CheckQs => self.load_quiescence(stage),
        }
        self.enter(stage);
        true
    }

    fn advance_quiescence(&mut self) -> bool {
        let stage = self.next_stage();
        match stage {
            Stage::End => return false,
            Stage::EvasionQs | Stage::CaptureQs | Stage::CheckQs => self.load_quiescence(stage),
            _ => {
                debug_assert!(false, "{stage:?} needs thread tables");
                self.list.clear();
            }
        }
        self.enter(stage);
        true
    }

    fn next_stage(&mut self) -> Stage {
        let stage = initialize_tables().stage(self.pc);
        if stage != Stage::End {
            self.pc += 1;
        }
        stage
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.filter = Filter::for_stage(stage);
        self.pos = 0;
    }

    fn load_captures(&mut self) {
        let board = self.board;
        generate_captures(board, &mut self.scratch);
        self.list.fill(&self.scratch, |mv| mvv_lva(board, mv));
        self.list.sort();
    }

    fn load_quiescence(&mut self, stage: Stage) {
        let board = self.board;
        match stage {
            Stage::EvasionQs => {
                generate_pseudo_evasions(board, self.attack, &mut self.scratch);
                self.list.fill(&self.scratch, |mv| move_value_simple(board, mv));
                self.list.sort();
            }
            Stage::CaptureQs => self.load_captures(),
            Stage::CheckQs => {
                // Quiet checks all share the baseline, so the list stays unsorted.
                generate_quiet_checks(board, &mut self.scratch);
                self.list.fill(&self.scratch, |mv| move_value_simple(board, mv));
            }
            _ => unreachable!("{stage:?} is not a quiescence stage"),
        }
    }

    // ── Filters ──────────────────────────────────────────────────────────────

    #[inline]
    fn is_legal(&self, mv: Move) -> bool {
        self.board.is_legal_pseudo_move(mv)
    }

    fn is_killer(&self, mv: Move) -> bool {
        self.killers.contains(&mv)
    }

    /// Apply the main-search filter; `Some` carries the telemetry value.
    fn admit_main(&mut self, mv: Move, score: i32, tables: &ThreadTables<'_>) -> Option<i32> {
        let board = self.board;
        let admitted = match self.filter {
            Filter::None => true,
            Filter::Legal => self.is_legal(mv),
            Filter::TransKiller => board.is_pseudo_move(mv) && self.is_legal(mv),
            Filter::GoodCapture => {
                if mv == self.trans_killer {
                    return None;
                }
                if !capture_is_good(board, mv, self.in_pv, &self.config) {
                    self.bad.push(mv, score + BAD_SCORE);
                    return None;
                }
                self.is_legal(mv)
            }
            Filter::BadCapture => {
                return self.is_legal(mv).then_some(HISTORY_BAD_CAPTURE);
            }
            Filter::Killer => {
                if mv == self.trans_killer
                    || !board.is_quiet_pseudo_move(mv)
                    || !self.is_legal(mv)
                {
                    return None;
                }
                return Some(HISTORY_KILLER);
            }
            Filter::Quiet => {
                if mv == self.trans_killer || self.is_killer(mv) || !self.is_legal(mv) {
                    return None;
                }
                return Some(history_prob(board, mv, tables.history()));
            }
            Filter::CaptureQs | Filter::CheckQs => return self.admit_quiescence(mv),
        };
        admitted.then_some(HISTORY_MAX as i32)
    }

    fn admit_quiescence(&self, mv: Move) -> Option<i32> {
        let admitted = match self.filter {
            Filter::None => true,
            Filter::Legal => self.is_legal(mv),
            Filter::CaptureQs => {
                capture_is_good(self.board, mv, false, &self.config) && self.is_legal(mv)
            }
            Filter::CheckQs => see_ge(self.board, mv, 0) && self.is_legal(mv),
            filter => {
                debug_assert!(false, "{filter:?} is not a quiescence filter");
                false
            }
        };
        admitted.then_some(HISTORY_MAX as i32)
    }
}
