//! Ordering values for individual moves.
//!
//! Score bands, highest first: hash move, good captures, killers, quiet
//! moves by history, bad captures. The bands never overlap.

use ordo_core::{Board, Move, PieceKind};

use crate::classify::{capture_is_good, piece_attacks_enemy_king};
use crate::config::OrderingConfig;
use crate::heuristics::{HistoryTable, KillerTable};
use crate::see::see_ge;

pub const TRANS_SCORE: i32 = 32_766;
pub const GOOD_SCORE: i32 = 4_000;
pub const KILLER_SCORE: i32 = 4;
pub const HISTORY_SCORE: i32 = -24_000;
pub const BAD_SCORE: i32 = -28_000;

/// Quiet-move bonus for a safe move that attacks the enemy king.
pub const KING_ATTACK_BONUS: i32 = 16;

/// History counters stay strictly below this value.
pub const HISTORY_MAX: u32 = 16_384;
/// Total counters stay strictly below this value.
pub const HISTORY_TOT_MAX: u32 = 16_384;
/// Fixed-point scale of [`history_prob`].
pub const HISTORY_PROB_SCALE: u32 = 16_384;

/// Served-value telemetry for the killer stage.
pub const HISTORY_KILLER: i32 = 16;
/// Served-value telemetry for the bad-capture stage.
pub const HISTORY_BAD_CAPTURE: i32 = 1;

/// 12 piece classes times 64 destination squares.
pub const HISTORY_SIZE: usize = 12 * 64;

/// Most valuable victim, least valuable attacker, in `-4..=29`.
///
/// Non-capturing promotions score by promoted piece and land below every
/// capture.
pub fn mvv_lva(board: &Board, mv: Move) -> i32 {
    if mv.is_en_passant() {
        return 5;
    }
    match (board.captured_piece(mv), board.piece_on(mv.source())) {
        (Some(victim), Some(attacker)) => victim.index() as i32 * 6 - attacker.index() as i32 + 5,
        _ => {
            debug_assert!(mv.is_promotion(), "mvv_lva on quiet move {mv}");
            mv.promotion_piece().to_piece_kind().index() as i32 - 5
        }
    }
}

/// Index into the history tables: `64 * piece + destination`.
#[inline]
pub fn history_index(board: &Board, mv: Move) -> usize {
    let piece = board.moving_piece(mv);
    debug_assert!(piece.is_some(), "history index for move {mv} from empty square");
    64 * piece.map_or(0, |p| p.index()) + mv.dest().index()
}

/// MVV-LVA shifted into the good or bad capture band.
pub fn capture_value(board: &Board, mv: Move) -> i32 {
    let value = mvv_lva(board, mv);
    if capture_is_good(board, mv, false, &OrderingConfig::DEFAULT) {
        value + GOOD_SCORE
    } else {
        value + BAD_SCORE
    }
}

/// Baseline plus the raw cutoff history of the move.
#[inline]
pub fn quiet_move_value(board: &Board, mv: Move, history: &HistoryTable) -> i32 {
    HISTORY_SCORE + history.history(history_index(board, mv)) as i32
}

/// Quiet-stage sort key: history value, plus [`KING_ATTACK_BONUS`] for a
/// safe piece move onto a square attacking the enemy king when enabled.
pub fn quiet_score(
    board: &Board,
    mv: Move,
    history: &HistoryTable,
    in_pv: bool,
    config: &OrderingConfig,
) -> i32 {
    let mut value = quiet_move_value(board, mv, history);
    if config.quiet_king_attacks
        && in_pv
        && !matches!(board.piece_on(mv.source()), Some(PieceKind::Pawn | PieceKind::King) | None)
        && piece_attacks_enemy_king(board, mv)
        && see_ge(board, mv, 0)
    {
        value += KING_ATTACK_BONUS;
    }
    value
}

/// Quiescence evasion scoring: flat baseline for quiets, MVV-LVA for tactics.
pub fn move_value_simple(board: &Board, mv: Move) -> i32 {
    if board.is_tactical(mv) {
        mvv_lva(board, mv)
    } else {
        HISTORY_SCORE
    }
}

/// Success rate of the move's (piece, destination) pair, scaled to
/// `0..=HISTORY_PROB_SCALE` and rounded to nearest.
pub fn history_prob(board: &Board, mv: Move, history: &HistoryTable) -> i32 {
    let index = history_index(board, mv);
    let (hit, total) = history.ratio(index);
    let total = u64::from(total.max(1));
    let hit = u64::from(hit).min(total);
    ((hit * u64::from(HISTORY_PROB_SCALE) + total / 2) / total) as i32
}

/// Killer tier of `mv` at `height`: 4 and 3 for this height's slots, 2 and
/// 1 for the slots two plies up.
pub fn killer_value(killers: &KillerTable, height: usize, mv: Move) -> Option<i32> {
    if mv.is_null() {
        return None;
    }
    let [k1, k2] = killers.get(height);
    if mv == k1 {
        return Some(KILLER_SCORE);
    }
    if mv == k2 {
        return Some(KILLER_SCORE - 1);
    }
    if height > 2 {
        let [k3, k4] = killers.get(height - 2);
        if mv == k3 {
            return Some(KILLER_SCORE - 2);
        }
        if mv == k4 {
            return Some(KILLER_SCORE - 3);
        }
    }
    None
}

/// Full ordering value, used to sort evasions in one pass.
pub fn move_value(
    board: &Board,
    mv: Move,
    height: usize,
    trans_killer: Move,
    killers: &KillerTable,
    history: &HistoryTable,
) -> i32 {
    if !trans_killer.is_null() && mv == trans_killer {
        TRANS_SCORE
    } else if board.is_tactical(mv) {
        capture_value(board, mv)
    } else if let Some(value) = killer_value(killers, height, mv) {
        value
    } else {
        quiet_move_value(board, mv, history)
    }
}
