//! Integration tests for the staged move iterator.
//!
//! Checks that every legal move is served exactly once, that stages come
//! out in program order, and that hash and killer moves are never repeated.

use std::collections::HashSet;

use ordo_core::{AttackInfo, Board, Move, Square, generate_legal_moves};
use ordo_sort::score::{
    BAD_SCORE, GOOD_SCORE, HISTORY_BAD_CAPTURE, HISTORY_KILLER, HISTORY_SCORE, TRANS_SCORE, mvv_lva,
};
use ordo_sort::{OrderingTables, SortContext, Stage, ThreadTables};

const KIWIPETE_FEN: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

const MIDDLEGAME_FEN: &str =
    "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N1PN2/PP2BPPP/R2QKB1R w KQ - 0 8";

const PROMOTION_FEN: &str = "1r2k3/P1P5/8/8/2n5/1Q6/8/4K3 w - - 0 1";

const EN_PASSANT_FEN: &str = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1";

/// The rook checks along the first rank. Bxa1, Bc1 and Re1 are the only
/// legal replies.
const BACK_RANK_CHECK_FEN: &str = "k7/8/8/8/8/8/1B2R1PP/r6K w - - 0 1";

fn parse(fen: &str) -> Board {
    fen.parse().unwrap()
}

fn uci(board: &Board, text: &str) -> Move {
    Move::from_uci(text, board).unwrap()
}

fn stage_rank(stage: Stage) -> usize {
    match stage {
        Stage::Trans => 0,
        Stage::GoodCapture => 1,
        Stage::Killer => 2,
        Stage::Quiet => 3,
        Stage::BadCapture => 4,
        other => panic!("unexpected main-search stage {other:?}"),
    }
}

/// Drain a main-search context, recording move, stage, score and value.
fn run_main(
    board: &Board,
    height: usize,
    hash: Move,
    in_pv: bool,
    tables: &ThreadTables<'_>,
) -> Vec<(Move, Stage, i32, i32)> {
    let attack = AttackInfo::new(board);
    let mut ctx = SortContext::init_main(board, &attack, height, hash, in_pv, tables);
    let mut served = Vec::new();
    while let Some(mv) = ctx.next_main(tables) {
        served.push((mv, ctx.stage(), ctx.score(), ctx.value()));
    }
    served
}

fn assert_exhaustive(board: &Board, served: &[(Move, Stage, i32, i32)]) {
    let legal = generate_legal_moves(board);
    let unique: HashSet<Move> = served.iter().map(|s| s.0).collect();
    assert_eq!(unique.len(), served.len(), "a move was served twice: {served:?}");
    assert_eq!(served.len(), legal.len(), "served {served:?}");
    for &mv in &legal {
        assert!(unique.contains(&mv), "legal move {mv} never served");
    }
}

// ── Exhaustiveness ────────────────────────────────────────────────────────────

#[test]
fn every_legal_move_served_once() {
    let mut tables = OrderingTables::new(1);
    let thread = tables.thread(0);
    for fen in [KIWIPETE_FEN, MIDDLEGAME_FEN, PROMOTION_FEN, EN_PASSANT_FEN] {
        let board = parse(fen);
        for in_pv in [false, true] {
            let served = run_main(&board, 5, Move::NULL, in_pv, &thread);
            assert_exhaustive(&board, &served);
        }
    }
}

#[test]
fn hash_and_killers_are_not_served_twice() {
    let board = parse(KIWIPETE_FEN);
    let mut tables = OrderingTables::new(1);
    let mut thread = tables.thread(0);

    // Two killers at this height and a grand killer the rook cannot play
    // through its own pawn.
    let a3 = uci(&board, "a2a3");
    let g4 = uci(&board, "g2g4");
    let blocked = Move::new(Square::A1, Square::A5);
    thread.record_cutoff_move(&board, a3, 3, 6);
    thread.record_cutoff_move(&board, g4, 3, 6);
    thread.record_cutoff_move(&board, blocked, 2, 4);
    // Captures never become killers.
    thread.record_cutoff_move(&board, uci(&board, "d5e6"), 2, 4);
    assert_eq!(thread.killers().get(4), [blocked, Move::NULL]);

    let hash = uci(&board, "e2a6");
    let served = run_main(&board, 6, hash, false, &thread);
    assert_exhaustive(&board, &served);

    assert_eq!(served[0].0, hash);
    assert_eq!(served[0].1, Stage::Trans);
    let killers: Vec<Move> = served
        .iter()
        .filter(|s| s.1 == Stage::Killer)
        .map(|s| s.0)
        .collect();
    assert_eq!(killers, vec![g4, a3]);
    assert!(served.iter().filter(|s| s.1 == Stage::Killer).all(|s| s.3 == HISTORY_KILLER));
}

#[test]
fn quiet_hash_move_in_killer_slot_served_once() {
    let board = Board::starting_position();
    let mut tables = OrderingTables::new(1);
    let mut thread = tables.thread(0);
    let nf3 = uci(&board, "g1f3");
    thread.record_cutoff_move(&board, nf3, 4, 2);

    let served = run_main(&board, 2, nf3, false, &thread);
    assert_exhaustive(&board, &served);
    let hits: Vec<_> = served.iter().filter(|s| s.0 == nf3).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].1, Stage::Trans);
    assert!(served.iter().all(|s| s.1 != Stage::Killer));
}

// ── Ordering contract ────────────────────────────────────────────────────────

#[test]
fn stages_come_out_in_program_order() {
    let mut tables = OrderingTables::new(1);
    let mut thread = tables.thread(0);
    let board = parse(MIDDLEGAME_FEN);
    thread.record_cutoff_move(&board, uci(&board, "a2a3"), 5, 3);
    thread.record_cutoff_move(&board, uci(&board, "h2h3"), 5, 1);

    for fen in [KIWIPETE_FEN, MIDDLEGAME_FEN, PROMOTION_FEN] {
        let board = parse(fen);
        let served = run_main(&board, 3, Move::NULL, false, &thread);
        let ranks: Vec<usize> = served.iter().map(|s| stage_rank(s.1)).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{fen}: {served:?}");
    }
}

#[test]
fn scores_descend_within_sorted_stages() {
    let board = parse(KIWIPETE_FEN);
    let mut tables = OrderingTables::new(1);
    let mut thread = tables.thread(0);
    thread.record_cutoff_move(&board, uci(&board, "e1d1"), 9, 10);
    thread.record_cutoff_move(&board, uci(&board, "a2a4"), 6, 11);

    let served = run_main(&board, 1, Move::NULL, false, &thread);
    for stage in [Stage::GoodCapture, Stage::Quiet, Stage::BadCapture] {
        let scores: Vec<i32> = served.iter().filter(|s| s.1 == stage).map(|s| s.2).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{stage:?}: {scores:?}");
    }

    // All four killer tiers filled: this height's pair plus the grand killers.
    let start = Board::starting_position();
    for (text, height) in [("h2h3", 4), ("g1f3", 4), ("a2a3", 2), ("b1c3", 2)] {
        thread.record_cutoff_move(&start, uci(&start, text), 4, height);
    }
    let served = run_main(&start, 4, Move::NULL, false, &thread);
    let killers: Vec<(String, i32)> = served
        .iter()
        .filter(|s| s.1 == Stage::Killer)
        .map(|s| (s.0.to_string(), s.2))
        .collect();
    assert_eq!(
        killers,
        [("g1f3", 4), ("h2h3", 3), ("b1c3", 2), ("a2a3", 1)].map(|(m, v)| (m.to_string(), v))
    );
    for stage in [Stage::GoodCapture, Stage::Killer, Stage::Quiet, Stage::BadCapture] {
        let scores: Vec<i32> = served.iter().filter(|s| s.1 == stage).map(|s| s.2).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{stage:?}: {scores:?}");
    }
}

#[test]
fn losing_capture_waits_for_bad_capture_stage() {
    // The rook takes a pawn defended by a pawn; SEE and victim both say bad.
    let board = parse("4k3/8/2p5/3p4/8/8/8/3RK3 w - - 0 1");
    let rxd5 = uci(&board, "d1d5");
    let mut tables = OrderingTables::new(1);
    let thread = tables.thread(0);
    let served = run_main(&board, 1, Move::NULL, false, &thread);
    assert_exhaustive(&board, &served);

    let last = *served.last().unwrap();
    assert_eq!(last.0, rxd5);
    assert_eq!(last.1, Stage::BadCapture);
    assert_eq!(last.2, mvv_lva(&board, rxd5) + BAD_SCORE);
    assert_eq!(last.3, HISTORY_BAD_CAPTURE);
    assert_eq!(served.iter().filter(|s| s.1 == Stage::BadCapture).count(), 1);
}

#[test]
fn small_see_loss_is_deferred() {
    // The knight takes a pawn that the bishop recaptures: SEE is 100 - 320.
    let board = parse("4k3/8/8/1b6/8/3p4/8/2N1K3 w - - 0 1");
    let nxd3 = uci(&board, "c1d3");
    let mut tables = OrderingTables::new(1);
    let thread = tables.thread(0);
    let served = run_main(&board, 1, Move::NULL, false, &thread);
    let entry = served.iter().find(|s| s.0 == nxd3).unwrap();
    assert_eq!(entry.1, Stage::BadCapture);
    assert_eq!(entry.2, mvv_lva(&board, nxd3) + BAD_SCORE);
}

// ── In check ─────────────────────────────────────────────────────────────────

#[test]
fn three_evasions_sorted_by_value() {
    let board = parse(BACK_RANK_CHECK_FEN);
    let attack = AttackInfo::new(&board);
    assert!(attack.in_check());
    assert_eq!(generate_legal_moves(&board).len(), 3);

    let mut tables = OrderingTables::new(1);
    let thread = tables.thread(0);
    let served = run_main(&board, 4, Move::NULL, false, &thread);
    assert_exhaustive(&board, &served);
    assert!(served.iter().all(|s| s.1 == Stage::LegalEvasion));
    assert!(served.windows(2).all(|w| w[0].2 >= w[1].2));

    let bxa1 = uci(&board, "b2a1");
    assert_eq!(served[0].0, bxa1);
    assert_eq!(served[0].2, mvv_lva(&board, bxa1) + GOOD_SCORE);
    // Both blocks are quiet with no history; generation order decides.
    assert_eq!(served[1].2, HISTORY_SCORE);
    assert_eq!(served[2].2, HISTORY_SCORE);
}

#[test]
fn evasion_hash_move_comes_first() {
    let board = parse(BACK_RANK_CHECK_FEN);
    let mut tables = OrderingTables::new(1);
    let thread = tables.thread(0);
    let re1 = uci(&board, "e2e1");
    let served = run_main(&board, 4, re1, false, &thread);
    assert_eq!(served.len(), 3);
    assert_eq!(served[0].0, re1);
    assert_eq!(served[0].2, TRANS_SCORE);
    assert_eq!(served[1].0, uci(&board, "b2a1"));
}

// ── Quiescence ───────────────────────────────────────────────────────────────

#[test]
fn quiescence_checks_follow_captures() {
    // Rxb7 wins a pawn, then Rh8+ is the only quiet check.
    let board = parse("4k3/1p6/8/8/8/8/8/1R2K2R w - - 0 1");
    let attack = AttackInfo::new(&board);
    let mut ctx = SortContext::init_quiescence(&board, &attack, true);
    let mut served = Vec::new();
    while let Some(mv) = ctx.next_quiescence() {
        served.push((mv, ctx.stage()));
    }
    assert!(served.iter().all(|s| s.0 != Move::NULL));
    assert!(served.iter().any(|s| s.1 == Stage::CheckQs));
    for &(mv, stage) in &served {
        match stage {
            Stage::CaptureQs => assert!(board.is_tactical(mv)),
            Stage::CheckQs => assert!(board.gives_check(mv) && !board.is_tactical(mv)),
            other => panic!("unexpected stage {other:?}"),
        }
    }
    assert_eq!(
        served,
        vec![(uci(&board, "b1b7"), Stage::CaptureQs), (uci(&board, "h1h8"), Stage::CheckQs)]
    );

    let mut captures_only = SortContext::init_quiescence(&board, &attack, false);
    assert_eq!(captures_only.next_quiescence(), Some(uci(&board, "b1b7")));
    assert_eq!(captures_only.next_quiescence(), None);
}

#[test]
fn quiescence_drops_checks_that_lose_material() {
    // Rd8+ hangs the rook to the c6 knight; Ra8+ is safe.
    let board = parse("6k1/5ppp/2n5/8/8/8/8/R2R3K w - - 0 1");
    let rd8 = uci(&board, "d1d8");
    assert!(board.gives_check(rd8) && !board.is_tactical(rd8));

    let attack = AttackInfo::new(&board);
    let mut ctx = SortContext::init_quiescence(&board, &attack, true);
    let mut served = Vec::new();
    while let Some(mv) = ctx.next_quiescence() {
        served.push((mv, ctx.stage()));
    }
    assert_eq!(served, vec![(uci(&board, "a1a8"), Stage::CheckQs)]);
}

#[test]
fn quiescence_in_check_tries_all_evasions() {
    let board = parse(BACK_RANK_CHECK_FEN);
    let attack = AttackInfo::new(&board);
    let mut ctx = SortContext::init_quiescence(&board, &attack, false);
    let mut served = HashSet::new();
    while let Some(mv) = ctx.next_quiescence() {
        assert_eq!(ctx.stage(), Stage::EvasionQs);
        served.insert(mv);
    }
    let legal: HashSet<Move> = generate_legal_moves(&board).as_slice().iter().copied().collect();
    assert_eq!(served, legal);
}
