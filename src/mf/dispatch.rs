//! Strategy dispatcher: maps a compression quality (1–10) onto one of the
//! ten match-finder configurations and exposes the uniform contract.
//!
//! | Quality | Strategy | Configuration |
//! |---------|----------------|------------------------------------------|
//! | 1       | [`H1`] quick   | 16 bucket bits, sweep 1, dictionary      |
//! | 2       | [`H2`] quick   | 16 bucket bits, sweep 2                  |
//! | 3       | [`H3`] quick   | 16 bucket bits, sweep 4                  |
//! | 4       | [`H4`] quick   | 17 bucket bits, sweep 4, dictionary      |
//! | 5       | [`H5`] chain   | 14 bucket bits, block 4, 4 last dists    |
//! | 6       | [`H6`] chain   | 14 bucket bits, block 5, 4 last dists    |
//! | 7       | [`H7`] chain   | 15 bucket bits, block 6, 10 last dists   |
//! | 8       | [`H8`] chain   | 15 bucket bits, block 7, 10 last dists   |
//! | 9       | [`H9`] chain   | 15 bucket bits, block 8, 16 last dists   |
//! | 10      | [`H10`] tree   | `lgwin` window, depth 32, nice length 48 |
//!
//! Exactly one strategy is instantiated per stream; the variant is the only
//! live index state for the stream's lifetime.

use std::fmt;

use super::chain::ChainMatcher;
use super::dict::StaticDictionary;
use super::quick::QuickMatcher;
use super::tree::TreeMatcher;
use super::types::{BackwardMatch, LongestMatch};

// ─────────────────────────────────────────────────────────────────────────────
// Strategy configurations
// ─────────────────────────────────────────────────────────────────────────────

/// Enabling the dictionary on the sweep-1 variant compresses small text and
/// html inputs measurably better at a sub-percent speed cost.
pub type H1 = QuickMatcher<16, 1, true>;
pub type H2 = QuickMatcher<16, 2, false>;
pub type H3 = QuickMatcher<16, 4, false>;
pub type H4 = QuickMatcher<17, 4, true>;
pub type H5 = ChainMatcher<14, 4, 4>;
pub type H6 = ChainMatcher<14, 5, 4>;
pub type H7 = ChainMatcher<15, 6, 10>;
pub type H8 = ChainMatcher<15, 7, 10>;
pub type H9 = ChainMatcher<15, 8, 16>;
pub type H10 = TreeMatcher;

pub const QUALITY_MIN: i32 = 1;
pub const QUALITY_MAX: i32 = 10;

pub const LGWIN_MIN: u32 = 10;
pub const LGWIN_MAX: u32 = 24;

/// Tree-search node budget for quality 10.
pub const TREE_MAX_SEARCH_DEPTH: u32 = 32;
/// "Good enough" match length for quality 10.
pub const TREE_NICE_LENGTH: u32 = 48;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors reported by the match-finder front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFinderError {
    /// The binary-tree strategy (quality 10) cannot be primed with a custom
    /// dictionary.
    CustomDictionaryUnsupported,
}

impl fmt::Display for MatchFinderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFinderError::CustomDictionaryUnsupported => {
                write!(f, "custom dictionary is not supported by the tree matcher")
            }
        }
    }
}

impl std::error::Error for MatchFinderError {}

// ─────────────────────────────────────────────────────────────────────────────
// MatchFinder
// ─────────────────────────────────────────────────────────────────────────────

/// The configured match finder for one stream.
pub enum MatchFinder {
    H1(H1),
    H2(H2),
    H3(H3),
    H4(H4),
    H5(H5),
    H6(H6),
    H7(H7),
    H8(H8),
    H9(H9),
    H10(H10),
}

impl MatchFinder {
    /// Instantiate the strategy for `quality`, clamped to `1..=10`.  `lgwin`
    /// (clamped to `10..=24`) sizes the quality-10 window and is ignored by
    /// the table-based strategies, whose footprint is fixed by their type.
    pub fn new(quality: i32, lgwin: u32) -> Self {
        let lgwin = lgwin.clamp(LGWIN_MIN, LGWIN_MAX);
        match quality.clamp(QUALITY_MIN, QUALITY_MAX) {
            1 => MatchFinder::H1(H1::new()),
            2 => MatchFinder::H2(H2::new()),
            3 => MatchFinder::H3(H3::new()),
            4 => MatchFinder::H4(H4::new()),
            5 => MatchFinder::H5(H5::new()),
            6 => MatchFinder::H6(H6::new()),
            7 => MatchFinder::H7(H7::new()),
            8 => MatchFinder::H8(H8::new()),
            9 => MatchFinder::H9(H9::new()),
            _ => MatchFinder::H10(TreeMatcher::new(
                lgwin,
                TREE_MAX_SEARCH_DEPTH,
                TREE_NICE_LENGTH,
            )),
        }
    }

    /// The quality level this instance was configured for.
    pub fn quality(&self) -> i32 {
        match self {
            MatchFinder::H1(_) => 1,
            MatchFinder::H2(_) => 2,
            MatchFinder::H3(_) => 3,
            MatchFinder::H4(_) => 4,
            MatchFinder::H5(_) => 5,
            MatchFinder::H6(_) => 6,
            MatchFinder::H7(_) => 7,
            MatchFinder::H8(_) => 8,
            MatchFinder::H9(_) => 9,
            MatchFinder::H10(_) => 10,
        }
    }

    /// Bytes read past a position when it is stored; callers must guarantee
    /// this much lookahead before `store`.
    pub fn hash_type_length(&self) -> usize {
        match self {
            MatchFinder::H1(_) | MatchFinder::H2(_) | MatchFinder::H3(_) | MatchFinder::H4(_) => {
                QuickMatcher::<16, 1, true>::HASH_TYPE_LENGTH
            }
            MatchFinder::H5(_)
            | MatchFinder::H6(_)
            | MatchFinder::H7(_)
            | MatchFinder::H8(_)
            | MatchFinder::H9(_) => ChainMatcher::<14, 4, 4>::HASH_TYPE_LENGTH,
            MatchFinder::H10(_) => TreeMatcher::HASH_TYPE_LENGTH,
        }
    }

    /// Empty all indexing state.  The stream view is untouched.
    pub fn reset(&mut self) {
        match self {
            MatchFinder::H1(m) => m.reset(),
            MatchFinder::H2(m) => m.reset(),
            MatchFinder::H3(m) => m.reset(),
            MatchFinder::H4(m) => m.reset(),
            MatchFinder::H5(m) => m.reset(),
            MatchFinder::H6(m) => m.reset(),
            MatchFinder::H7(m) => m.reset(),
            MatchFinder::H8(m) => m.reset(),
            MatchFinder::H9(m) => m.reset(),
            MatchFinder::H10(m) => m.reset(),
        }
    }

    /// Index position `ix` of the view.  For the tree strategy this runs the
    /// skip path, which must still maintain the tree at unrecorded
    /// positions.
    pub fn store(&mut self, data: &[u8], mask: usize, ix: usize) {
        let masked = ix & mask;
        match self {
            MatchFinder::H1(m) => m.store(&data[masked..], ix),
            MatchFinder::H2(m) => m.store(&data[masked..], ix),
            MatchFinder::H3(m) => m.store(&data[masked..], ix),
            MatchFinder::H4(m) => m.store(&data[masked..], ix),
            MatchFinder::H5(m) => m.store(&data[masked..], ix),
            MatchFinder::H6(m) => m.store(&data[masked..], ix),
            MatchFinder::H7(m) => m.store(&data[masked..], ix),
            MatchFinder::H8(m) => m.store(&data[masked..], ix),
            MatchFinder::H9(m) => m.store(&data[masked..], ix),
            MatchFinder::H10(m) => m.skip_byte(data, mask, ix, data.len().saturating_sub(masked)),
        }
    }

    /// Index `len` consecutive positions starting at `start_ix`; equivalent
    /// to calling [`store`](Self::store) for each position in order.
    pub fn store_range(&mut self, data: &[u8], len: usize, start_ix: usize, mask: usize) {
        for p in 0..len {
            self.store(data, mask, start_ix + p);
        }
    }

    /// Search for a back-reference at `cur_ix` that strictly improves on
    /// `best`; outputs are written only on improvement.  Returns whether an
    /// improvement was found.
    ///
    /// The tree strategy indexes `cur_ix` as a side effect; every other
    /// strategy leaves storing to the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn find_longest_match(
        &mut self,
        data: &[u8],
        mask: usize,
        dictionary: &StaticDictionary,
        distance_cache: &[i32; 4],
        cur_ix: usize,
        max_length: usize,
        max_backward: usize,
        best: &mut LongestMatch,
    ) -> bool {
        match self {
            MatchFinder::H1(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H2(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H3(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H4(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H5(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H6(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H7(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H8(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H9(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
            MatchFinder::H10(m) => m.find_longest_match(
                data, mask, dictionary, distance_cache, cur_ix, max_length, max_backward, best,
            ),
        }
    }

    /// Write every candidate at `cur_ix` into `matches`, sorted by
    /// non-decreasing length; returns the count.  Collapses to one entry
    /// when a match reaches [`MAX_ZOPFLI_LEN`] (or the tree's nice length).
    ///
    /// `matches` needs `MAX_ZOPFLI_LEN + MAX_DICTIONARY_MATCH_LEN` slots.
    /// The tree strategy derives its distance bound from its own window and
    /// indexes `cur_ix` as a side effect.
    ///
    /// [`MAX_ZOPFLI_LEN`]: super::types::MAX_ZOPFLI_LEN
    #[allow(clippy::too_many_arguments)]
    pub fn find_all_matches(
        &mut self,
        data: &[u8],
        mask: usize,
        dictionary: &StaticDictionary,
        cur_ix: usize,
        max_length: usize,
        max_backward: usize,
        matches: &mut [BackwardMatch],
    ) -> usize {
        match self {
            MatchFinder::H1(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H2(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H3(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H4(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H5(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H6(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H7(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H8(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H9(m) => m.find_all_matches(
                data, mask, dictionary, cur_ix, max_length, max_backward, matches,
            ),
            MatchFinder::H10(m) => {
                m.find_all_matches(data, mask, dictionary, cur_ix, max_length, matches)
            }
        }
    }

    /// Prime the index with a caller-supplied dictionary: every position of
    /// `dict` with enough lookahead is stored as if it had been compressed,
    /// without emitting output.  Stream positions then start at
    /// `dict.len()`.
    ///
    /// The tree strategy does not support warmup and reports
    /// [`MatchFinderError::CustomDictionaryUnsupported`].
    pub fn prepend_custom_dictionary(&mut self, dict: &[u8]) -> Result<(), MatchFinderError> {
        if matches!(self, MatchFinder::H10(_)) {
            return Err(MatchFinderError::CustomDictionaryUnsupported);
        }
        let lookahead = self.hash_type_length();
        if dict.len() < lookahead {
            return Ok(());
        }
        for ix in 0..=dict.len() - lookahead {
            match self {
                MatchFinder::H1(m) => m.store(&dict[ix..], ix),
                MatchFinder::H2(m) => m.store(&dict[ix..], ix),
                MatchFinder::H3(m) => m.store(&dict[ix..], ix),
                MatchFinder::H4(m) => m.store(&dict[ix..], ix),
                MatchFinder::H5(m) => m.store(&dict[ix..], ix),
                MatchFinder::H6(m) => m.store(&dict[ix..], ix),
                MatchFinder::H7(m) => m.store(&dict[ix..], ix),
                MatchFinder::H8(m) => m.store(&dict[ix..], ix),
                MatchFinder::H9(m) => m.store(&dict[ix..], ix),
                MatchFinder::H10(_) => unreachable!(),
            }
        }
        Ok(())
    }
}
