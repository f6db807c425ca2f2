//! Killer moves and history counters, and the tables that own them.
//!
//! Killers are private to each search thread. History, hit and total
//! counters are shared by every thread without locks: each cell is an
//! `AtomicU32` accessed with `Relaxed` loads and stores, never
//! read-modify-write. Two threads bumping the same cell at once may lose an
//! increment; that only nudges move ordering, and the rescale step bounds
//! any drift.
//!
//! Hit and total live in one cell (hit in the high half) so a reader never
//! sees a hit count from one update paired with a total from another.

use std::sync::atomic::{AtomicU32, Ordering};

use ordo_core::{Board, Move};
use tracing::{debug, trace};

use crate::config::OrderingConfig;
use crate::score::{HISTORY_MAX, HISTORY_SIZE, HISTORY_TOT_MAX, history_index};

/// Deepest node height tracked by the killer table.
pub const MAX_PLY: usize = 128;

/// Two killer moves per height: quiet moves that caused beta cutoffs.
#[derive(Clone)]
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    /// Create an empty killer table.
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }

    /// Store a killer at `height`, shifting slot 0 into slot 1 unless the
    /// move already occupies slot 0.
    pub fn store(&mut self, height: usize, mv: Move) {
        debug_assert!(height < MAX_PLY, "killer height {height} out of range");
        let Some(slot) = self.slots.get_mut(height) else {
            return;
        };
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    /// Both killer slots at `height`; [`Move::NULL`] marks an empty slot.
    #[inline]
    pub fn get(&self, height: usize) -> [Move; 2] {
        self.slots.get(height).copied().unwrap_or([Move::NULL; 2])
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

fn cells<const N: usize>(value: u32) -> [AtomicU32; N] {
    std::array::from_fn(|_| AtomicU32::new(value))
}

const INITIAL_RATIO: u32 = pack(1, 1);

#[inline]
const fn pack(hit: u32, total: u32) -> u32 {
    hit << 16 | total
}

/// Cutoff history plus hit/total success counters, indexed by
/// `64 * piece + destination` (see [`history_index`]).
pub struct HistoryTable {
    history: [AtomicU32; HISTORY_SIZE],
    ratio: [AtomicU32; HISTORY_SIZE],
}

impl HistoryTable {
    /// History starts at 0; hit and total start at 1 so every ratio is defined.
    pub fn new() -> Self {
        Self {
            history: cells(0),
            ratio: cells(INITIAL_RATIO),
        }
    }

    /// Reset history to 0 and hit/total to 1 at every index.
    pub fn clear(&self) {
        for i in 0..HISTORY_SIZE {
            self.history[i].store(0, Ordering::Relaxed);
            self.ratio[i].store(INITIAL_RATIO, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn history(&self, index: usize) -> u32 {
        self.history[index].load(Ordering::Relaxed)
    }

    /// Hit and total counters of one index, read together.
    #[inline]
    pub fn ratio(&self, index: usize) -> (u32, u32) {
        let packed = self.ratio[index].load(Ordering::Relaxed);
        (packed >> 16, packed & 0xffff)
    }

    #[inline]
    pub fn hit(&self, index: usize) -> u32 {
        self.ratio(index).0
    }

    #[inline]
    pub fn total(&self, index: usize) -> u32 {
        self.ratio(index).1
    }

    /// Add `depth²` to the cutoff counter; halve the whole table whenever
    /// the counter reaches [`HISTORY_MAX`].
    pub fn add_cutoff(&self, index: usize, depth: u32) {
        let bonus = depth.saturating_mul(depth);
        let value = self.history(index).saturating_add(bonus);
        self.history[index].store(value, Ordering::Relaxed);

        while self.history(index) >= HISTORY_MAX {
            trace!(index, value = self.history(index), "rescaling history");
            for cell in &self.history {
                let v = cell.load(Ordering::Relaxed);
                if v >= 2 {
                    cell.store(v.div_ceil(2), Ordering::Relaxed);
                }
            }
        }
    }

    pub fn record_success(&self, index: usize) {
        let (hit, total) = self.ratio(index);
        self.store_ratio(index, hit + 1, total + 1);
    }

    pub fn record_failure(&self, index: usize) {
        let (hit, total) = self.ratio(index);
        self.store_ratio(index, hit, total + 1);
    }

    fn store_ratio(&self, index: usize, mut hit: u32, mut total: u32) {
        if total >= HISTORY_TOT_MAX {
            trace!(index, hit, total, "rescaling hit/total");
            hit = hit.div_ceil(2);
            total = total.div_ceil(2);
        }
        self.ratio[index].store(pack(hit.min(total), total), Ordering::Relaxed);
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns every ordering table for the lifetime of a thread pool.
pub struct OrderingTables {
    config: OrderingConfig,
    history: HistoryTable,
    killers: Vec<KillerTable>,
}

impl OrderingTables {
    /// Create tables for `threads` search threads (at least one).
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        debug!(threads, "allocating ordering tables");
        Self {
            config: OrderingConfig::default(),
            history: HistoryTable::new(),
            killers: vec![KillerTable::new(); threads],
        }
    }

    /// Reset killers to empty, history to 0 and hit/total to 1.
    pub fn clear(&mut self) {
        debug!(threads = self.killers.len(), "clearing ordering tables");
        self.history.clear();
        for killers in &mut self.killers {
            killers.clear();
        }
    }

    /// Change the number of killer partitions, keeping existing ones.
    pub fn resize_threads(&mut self, threads: usize) {
        let threads = threads.max(1);
        if threads != self.killers.len() {
            debug!(from = self.killers.len(), to = threads, "resizing killer tables");
            self.killers.resize_with(threads, KillerTable::new);
        }
    }

    /// Number of killer partitions.
    pub fn threads(&self) -> usize {
        self.killers.len()
    }

    pub fn config(&self) -> &OrderingConfig {
        &self.config
    }

    /// Toggles are read by each new [`SortContext`](crate::SortContext).
    pub fn config_mut(&mut self) -> &mut OrderingConfig {
        &mut self.config
    }

    /// The history table shared by every thread.
    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    /// Handle for a single thread; `id` must be below [`Self::threads`].
    pub fn thread(&mut self, id: usize) -> ThreadTables<'_> {
        debug_assert!(id < self.killers.len(), "thread {id} of {}", self.killers.len());
        ThreadTables {
            id,
            config: &self.config,
            history: &self.history,
            killers: &mut self.killers[id],
        }
    }

    /// One handle per thread, each owning its killer partition exclusively.
    ///
    /// The handles can be moved into `std::thread::scope` workers.
    pub fn split(&mut self) -> Vec<ThreadTables<'_>> {
        let config = &self.config;
        let history = &self.history;
        self.killers
            .iter_mut()
            .enumerate()
            .map(|(id, killers)| ThreadTables { id, config, history, killers })
            .collect()
    }
}

/// One search thread's view of the ordering tables.
pub struct ThreadTables<'a> {
    id: usize,
    config: &'a OrderingConfig,
    history: &'a HistoryTable,
    killers: &'a mut KillerTable,
}

impl<'a> ThreadTables<'a> {
    /// Index of the killer partition this handle owns.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn config(&self) -> &OrderingConfig {
        self.config
    }

    pub fn history(&self) -> &HistoryTable {
        self.history
    }

    /// This thread's killers only.
    pub fn killers(&self) -> &KillerTable {
        self.killers
    }

    /// Reward a quiet move that caused a beta cutoff at `height`.
    ///
    /// Tactical moves are ignored.
    pub fn record_cutoff_move(&mut self, board: &Board, mv: Move, depth: u32, height: usize) {
        if board.is_tactical(mv) {
            return;
        }
        self.killers.store(height, mv);
        self.history.add_cutoff(history_index(board, mv), depth);
    }

    /// Count a quiet move that was searched and succeeded.
    pub fn record_quiet_success(&self, board: &Board, mv: Move) {
        debug_assert!(!board.is_tactical(mv), "history update for tactical move {mv}");
        self.history.record_success(history_index(board, mv));
    }

    /// Count a quiet move that was searched and failed.
    pub fn record_quiet_failure(&self, board: &Board, mv: Move) {
        debug_assert!(!board.is_tactical(mv), "history update for tactical move {mv}");
        self.history.record_failure(history_index(board, mv));
    }
}
