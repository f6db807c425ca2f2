//! Leaper tables and directional ray tables, all built at compile time.
//!
//! Sliders use the classical blocker scan: take the ray in one direction,
//! find the nearest occupied square on it, and cut the ray off behind it.

use crate::bitboard::Bitboard;

/// (rank step, file step). Directions 0..4 walk toward higher square
/// indices, 4..8 toward lower ones, and `d ^ 4` is the opposite of `d`.
const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),   // north
    (0, 1),   // east
    (1, 1),   // north-east
    (1, -1),  // north-west
    (-1, 0),  // south
    (0, -1),  // west
    (-1, -1), // south-west
    (-1, 1),  // south-east
];

pub(crate) const ROOK_DIRECTIONS: [usize; 4] = [0, 1, 4, 5];
pub(crate) const BISHOP_DIRECTIONS: [usize; 4] = [2, 3, 6, 7];

const fn on_board(rank: i8, file: i8) -> bool {
    rank >= 0 && rank < 8 && file >= 0 && file < 8
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let rank = (sq / 8) as i8 + deltas[i].0;
            let file = (sq % 8) as i8 + deltas[i].1;
            if on_board(rank, file) {
                bits |= 1 << (rank * 8 + file);
            }
            i += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

const fn compute_rays() -> [[u64; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (dr, df) = DIRECTIONS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut rank = (sq / 8) as i8 + dr;
            let mut file = (sq % 8) as i8 + df;
            while on_board(rank, file) {
                table[dir][sq] |= 1 << (rank * 8 + file);
                rank += dr;
                file += df;
            }
            sq += 1;
        }
        dir += 1;
    }
    table
}

/// `(between, line)` for every square pair; empty when not aligned.
const fn compute_pair_tables() -> ([[Bitboard; 64]; 64], [[Bitboard; 64]; 64]) {
    let mut between = [[Bitboard::EMPTY; 64]; 64];
    let mut line = [[Bitboard::EMPTY; 64]; 64];
    let mut from = 0;
    while from < 64 {
        let mut dir = 0;
        while dir < 8 {
            let ray = RAY_BITS[dir][from];
            let full = ray | RAY_BITS[dir ^ 4][from] | (1 << from);
            let mut rest = ray;
            while rest != 0 {
                let to = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                between[from][to] = Bitboard::new(ray & !RAY_BITS[dir][to] & !(1 << to));
                line[from][to] = Bitboard::new(full);
            }
            dir += 1;
        }
        from += 1;
    }
    (between, line)
}

const RAY_BITS: [[u64; 64]; 8] = compute_rays();
const PAIR_TABLES: ([[Bitboard; 64]; 64], [[Bitboard; 64]; 64]) = compute_pair_tables();

pub(crate) static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&[
    (2, 1), (2, -1), (1, 2), (1, -2), (-1, 2), (-1, -2), (-2, 1), (-2, -1),
]);
pub(crate) static KING_ATTACKS: [Bitboard; 64] = leaper_table(&[
    (1, 0), (0, 1), (1, 1), (1, -1), (-1, 0), (0, -1), (-1, -1), (-1, 1),
]);
/// Indexed by color: white captures toward rank 8, black toward rank 1.
pub(crate) static PAWN_ATTACKS: [[Bitboard; 64]; 2] =
    [leaper_table(&[(1, -1), (1, 1)]), leaper_table(&[(-1, -1), (-1, 1)])];
pub(crate) static BETWEEN: [[Bitboard; 64]; 64] = PAIR_TABLES.0;
pub(crate) static LINE: [[Bitboard; 64]; 64] = PAIR_TABLES.1;

static RAYS: [[u64; 64]; 8] = RAY_BITS;

/// Attacks along one direction, up to and including the first blocker.
#[inline]
fn ray_attacks(dir: usize, sq: usize, occupied: u64) -> u64 {
    let ray = RAYS[dir][sq];
    let blockers = ray & occupied;
    if blockers == 0 {
        return ray;
    }
    let nearest = if dir < 4 {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    ray ^ RAYS[dir][nearest as usize]
}

#[inline]
pub(crate) fn slider_attacks(directions: &[usize; 4], sq: usize, occupied: Bitboard) -> Bitboard {
    let occupied = occupied.inner();
    Bitboard::new(directions.iter().fold(0, |acc, &dir| acc | ray_attacks(dir, sq, occupied)))
}
