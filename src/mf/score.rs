//! Candidate scoring and the recent-distance short-code tables.
//!
//! The longest candidate is not always the best one: a further-away match is
//! coded with more bits, approximated here as `log2(distance)`.  When a
//! distance can be expressed through one of the last four distances, a fixed
//! per-slot bit cost replaces the logarithm, rewarding repetition.  Both
//! scores grow by 5.4 per copied byte; higher is better.

// ─────────────────────────────────────────────────────────────────────────────
// Recent-distance short codes
// ─────────────────────────────────────────────────────────────────────────────

/// Which of the four cached distances short code `i` is derived from.
pub static DISTANCE_CACHE_INDEX: [usize; 16] = [
    0, 1, 2, 3, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1,
];

/// Delta added to the cached distance for short code `i`.
pub static DISTANCE_CACHE_OFFSET: [i32; 16] = [
    0, 0, 0, 0, -1, 1, -2, 2, -3, 3, -1, 1, -2, 2, -3, 3,
];

/// Fixed bit-cost estimate for each recent-distance short code.
///
/// Slot 0 (repeat the last distance exactly) is a bonus rather than a cost.
pub static DISTANCE_SHORT_CODE_BIT_COST: [f64; 16] = [
    -0.6, 0.95, 1.17, 1.27,
    0.93, 0.93, 0.96, 0.96, 0.99, 0.99,
    1.05, 1.05, 1.15, 1.15, 1.25, 1.25,
];

// ─────────────────────────────────────────────────────────────────────────────
// Scores
// ─────────────────────────────────────────────────────────────────────────────

/// Floor of the binary logarithm.  `v` must be non-zero.
#[inline(always)]
pub fn log2_floor(v: usize) -> u32 {
    debug_assert!(v > 0);
    usize::BITS - 1 - v.leading_zeros()
}

/// Score of a general back-reference: `5.4·len − 1.20·⌊log2(distance)⌋`.
///
/// `backward_reference_offset` must be at least 1.
#[inline]
pub fn backward_reference_score(copy_length: usize, backward_reference_offset: usize) -> f64 {
    5.4 * copy_length as f64 - 1.20 * f64::from(log2_floor(backward_reference_offset))
}

/// Score of a back-reference expressed through recent-distance short code
/// `distance_short_code`: `5.4·len − cost[code]`.
#[inline]
pub fn backward_reference_score_using_last_distance(
    copy_length: usize,
    distance_short_code: usize,
) -> f64 {
    5.4 * copy_length as f64 - DISTANCE_SHORT_CODE_BIT_COST[distance_short_code]
}
