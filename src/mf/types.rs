//! Shared match-finder types: the packed backward-match value, the in/out
//! block for longest-match search, the multiplicative hash helpers, and the
//! constants common to all strategies.

use crate::mem::load64;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Multiplier for the bucket-selection hashes.
///
/// The multiplier must be odd, or the highest input bit is lost.  It has no
/// long streaks of 1s or 0s, and was tuned against compression benchmarks;
/// oddity matters, primality does not.
pub const HASH_MUL32: u32 = 0x1E35_A7BD;

/// The maximum copy length for which an optimal parser keeps distinct
/// candidates.  Once a match reaches this length it dominates every shorter
/// alternative, and [`find_all_matches`] collapses to that single candidate.
///
/// [`find_all_matches`]: super::dispatch::MatchFinder::find_all_matches
pub const MAX_ZOPFLI_LEN: usize = 325;

// ─────────────────────────────────────────────────────────────────────────────
// Hash helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Multiplicative hash of a 32-bit word, keeping the top `bits` bits.
///
/// The high product bits carry the most mixture from the multiplication, so
/// the bucket index is taken from there.
#[inline(always)]
pub fn hash32(word: u32, bits: u32) -> u32 {
    word.wrapping_mul(HASH_MUL32) >> (32 - bits)
}

/// Multiplicative hash over the first 5 bytes at `data`, keeping the top
/// `bits` bits of the 64-bit product.
///
/// The 64-bit load is shifted left by 24 so exactly 5 stream bytes feed the
/// multiplication.  Hashing 5 bytes instead of 4 works much better for the
/// quick strategies, where the next store is likely to replace the slot.
///
/// Reads 8 bytes at `data`; callers guarantee lookahead.
#[inline(always)]
pub fn hash5(data: &[u8], bits: u32) -> u32 {
    let h = (load64(data) << 24).wrapping_mul(u64::from(HASH_MUL32));
    (h >> (64 - bits)) as u32
}

// ─────────────────────────────────────────────────────────────────────────────
// Ring-view byte gate
// ─────────────────────────────────────────────────────────────────────────────

/// Compare one byte of the view at two indices, treating any index outside
/// the view as a mismatch.
///
/// This is the cheap gate run before a full prefix-match: a candidate can
/// only improve on `best_len` if its `best_len`-th byte already matches.
#[inline(always)]
pub fn tail_bytes_equal(data: &[u8], a: usize, b: usize) -> bool {
    match (data.get(a), data.get(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BackwardMatch
// ─────────────────────────────────────────────────────────────────────────────

/// A packed `(distance, length, length_code)` back-reference candidate.
///
/// The length sits in the high bits of `length_and_code`; the low 5 bits hold
/// the length code, with 0 meaning "code equals length".  Dictionary matches
/// are the only producers of a distinct code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackwardMatch {
    pub distance: u32,
    pub length_and_code: u32,
}

impl BackwardMatch {
    /// A plain copy whose length code equals its length.
    #[inline]
    pub fn new(distance: usize, len: usize) -> Self {
        Self {
            distance: distance as u32,
            length_and_code: (len << 5) as u32,
        }
    }

    /// A match with an explicit length code (dictionary transforms).
    #[inline]
    pub fn with_code(distance: usize, len: usize, len_code: usize) -> Self {
        debug_assert!(len_code < 32);
        let code = if len == len_code { 0 } else { len_code };
        Self {
            distance: distance as u32,
            length_and_code: ((len << 5) | code) as u32,
        }
    }

    /// The number of bytes this candidate copies.
    #[inline]
    pub fn length(&self) -> usize {
        (self.length_and_code >> 5) as usize
    }

    /// The length code the entropy coder should emit.
    #[inline]
    pub fn length_code(&self) -> usize {
        let code = (self.length_and_code & 31) as usize;
        if code == 0 {
            self.length()
        } else {
            code
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LongestMatch
// ─────────────────────────────────────────────────────────────────────────────

/// In/out block for [`find_longest_match`].
///
/// `len` and `score` are read as the bar to beat and, together with
/// `len_code` and `distance`, written back only when a strictly better
/// candidate is found.  A fresh search starts from `LongestMatch::default()`
/// (zero length, zero score).
///
/// [`find_longest_match`]: super::dispatch::MatchFinder::find_longest_match
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LongestMatch {
    pub len: usize,
    pub len_code: usize,
    pub distance: usize,
    pub score: f64,
}
