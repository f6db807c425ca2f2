//! Integration tests for shared ordering tables under several threads.
//!
//! Each worker walks the game tree with the staged iterator, feeding
//! cutoffs and successes back into the tables the way a search would.
//! Leaf counts double as an exhaustiveness check on every node visited.

use ordo_core::{AttackInfo, Board, Move};
use ordo_sort::score::{HISTORY_MAX, HISTORY_SIZE, HISTORY_TOT_MAX};
use ordo_sort::{OrderingTables, SortContext, Stage, ThreadTables};

const KIWIPETE_FEN: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Count leaves at `depth`, treating the first quiet move of every node as
/// a cutoff and scoring the other quiet moves alternately as hits and misses.
fn walk(board: &Board, depth: u32, height: usize, tables: &mut ThreadTables<'_>) -> u64 {
    if depth == 0 {
        return 1;
    }
    let attack = AttackInfo::new(board);
    let mut ctx = SortContext::init_main(board, &attack, height, Move::NULL, height == 0, tables);
    let mut leaves = 0;
    let mut cutoff = None;
    let mut quiet_seen = 0;
    while let Some(mv) = ctx.next_main(tables) {
        if ctx.stage() == Stage::Quiet {
            if quiet_seen % 2 == 0 {
                tables.record_quiet_success(board, mv);
            } else {
                tables.record_quiet_failure(board, mv);
            }
            quiet_seen += 1;
        }
        if cutoff.is_none() && !board.is_tactical(mv) {
            cutoff = Some(mv);
        }
        leaves += walk(&board.make_move(mv), depth - 1, height + 1, tables);
    }
    if let Some(mv) = cutoff {
        tables.record_cutoff_move(board, mv, depth, height);
    }
    leaves
}

fn assert_tables_bounded(tables: &OrderingTables) {
    let history = tables.history();
    for index in 0..HISTORY_SIZE {
        let (hit, total) = history.ratio(index);
        assert!(hit <= total, "index {index}: hit {hit} > total {total}");
        assert!(total < HISTORY_TOT_MAX, "index {index}: total {total}");
        assert!(history.history(index) < HISTORY_MAX, "index {index}");
    }
}

// ── Single thread ─────────────────────────────────────────────────────────────

#[test]
fn single_thread_leaf_counts() {
    let mut tables = OrderingTables::new(1);
    let mut thread = tables.thread(0);
    assert_eq!(walk(&Board::starting_position(), 3, 0, &mut thread), 8_902);
    let kiwipete: Board = KIWIPETE_FEN.parse().unwrap();
    assert_eq!(walk(&kiwipete, 2, 0, &mut thread), 2_039);
    assert_tables_bounded(&tables);
}

// ── Multi-thread ──────────────────────────────────────────────────────────────

#[test]
fn four_threads_share_history_and_split_killers() {
    let mut tables = OrderingTables::new(4);
    let board: Board = KIWIPETE_FEN.parse().unwrap();

    let counts: Vec<u64> = std::thread::scope(|s| {
        let handles: Vec<_> = tables
            .split()
            .into_iter()
            .map(|mut thread| {
                let board = &board;
                s.spawn(move || {
                    // Each worker starts at a different height, as helper
                    // threads in a search would.
                    let height = thread.id();
                    walk(board, 2, height, &mut thread)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, vec![2_039; 4]);
    assert_tables_bounded(&tables);

    // A worker rooted at height `id` only touched heights `id` and `id + 1`
    // of its own partition.
    for id in 0..4 {
        let thread = tables.thread(id);
        assert!(!thread.killers().get(id)[0].is_null(), "thread {id} lost its killer");
        for height in (0..8).filter(|&h| h != id && h != id + 1) {
            assert_eq!(thread.killers().get(height), [Move::NULL; 2], "thread {id} height {height}");
        }
    }
}

#[test]
fn concurrent_rescales_keep_invariants() {
    let tables = OrderingTables::new(8);
    let history = tables.history();

    std::thread::scope(|s| {
        for worker in 0..8usize {
            s.spawn(move || {
                for round in 0..20_000usize {
                    let index = (worker * 97 + round) % 16;
                    history.add_cutoff(index, (round % 24) as u32);
                    if (round + worker) % 3 == 0 {
                        history.record_failure(index);
                    } else {
                        history.record_success(index);
                    }
                }
            });
        }
    });

    assert_tables_bounded(&tables);
}

#[test]
fn clear_resets_after_threads_finish() {
    let mut tables = OrderingTables::new(2);
    let board = Board::starting_position();
    std::thread::scope(|s| {
        for mut thread in tables.split() {
            let board = &board;
            s.spawn(move || {
                walk(board, 2, 0, &mut thread);
            });
        }
    });
    assert!((0..HISTORY_SIZE).any(|i| tables.history().history(i) > 0));

    tables.clear();
    for index in 0..HISTORY_SIZE {
        assert_eq!(tables.history().history(index), 0);
        assert_eq!(tables.history().ratio(index), (1, 1));
    }
    assert_eq!(tables.thread(1).killers().get(0), [Move::NULL; 2]);
}
