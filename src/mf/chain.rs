//! Block-chain match finders (qualities 5–9): per key, a ring of the last
//! `2^BLOCK_BITS` positions that hashed there, searched newest-first.
//!
//! Candidate order for the longest-match search: the recent-distance short
//! codes (a configurable number of them), the bucket ring, then two adjacent
//! static-dictionary slots under the usual throttle.  The ring walk stops at
//! the first out-of-window entry, since older entries are strictly further.
//!
//! The all-matches variant feeds optimal parsers: it adds a 64-position
//! near scan for very short matches and collapses the list to a single entry
//! when a candidate reaches [`MAX_ZOPFLI_LEN`].

use crate::mem::{find_match_length_with_limit, load32, unlikely};

use super::dict::{StaticDictionary, INVALID_MATCH, MAX_DICTIONARY_MATCH_LEN};
use super::score::{
    backward_reference_score, backward_reference_score_using_last_distance,
    DISTANCE_CACHE_INDEX, DISTANCE_CACHE_OFFSET,
};
use super::types::{hash32, tail_bytes_equal, BackwardMatch, LongestMatch, MAX_ZOPFLI_LEN};

/// Hash-bucketed ring match finder.
///
/// `BUCKET_BITS` sizes the key space, `BLOCK_BITS` the per-key ring, and
/// `NUM_LAST_DISTANCES` (4, 10 or 16) how many recent-distance short codes
/// the search tries first.
pub struct ChainMatcher<
    const BUCKET_BITS: u32,
    const BLOCK_BITS: u32,
    const NUM_LAST_DISTANCES: usize,
> {
    /// Per-key count of positions ever stored; the ring keeps the newest
    /// `2^BLOCK_BITS` of them.  Wraps at 16 bits by design.
    pub num: Box<[u16]>,
    /// Flat `2^BUCKET_BITS × 2^BLOCK_BITS` position rings.
    pub buckets: Box<[u32]>,
    pub num_dict_lookups: usize,
    pub num_dict_matches: usize,
}

impl<const BUCKET_BITS: u32, const BLOCK_BITS: u32, const NUM_LAST_DISTANCES: usize>
    ChainMatcher<BUCKET_BITS, BLOCK_BITS, NUM_LAST_DISTANCES>
{
    /// Bytes hashed by [`Self::hash_bytes`].
    pub const HASH_LENGTH: usize = 4;
    /// Bytes read when storing a position.
    pub const HASH_TYPE_LENGTH: usize = 4;

    const BUCKET_SIZE: usize = 1 << BUCKET_BITS;
    const BLOCK_SIZE: usize = 1 << BLOCK_BITS;
    const BLOCK_MASK: usize = (1 << BLOCK_BITS) - 1;

    pub fn new() -> Self {
        debug_assert!(NUM_LAST_DISTANCES <= DISTANCE_CACHE_INDEX.len());
        Self {
            num: vec![0u16; Self::BUCKET_SIZE].into_boxed_slice(),
            buckets: vec![0u32; Self::BUCKET_SIZE << BLOCK_BITS].into_boxed_slice(),
            num_dict_lookups: 0,
            num_dict_matches: 0,
        }
    }

    /// Forget all indexed positions.  Ring contents are left in place; a
    /// zero count makes them unreachable.
    pub fn reset(&mut self) {
        self.num.fill(0);
        self.num_dict_lookups = 0;
        self.num_dict_matches = 0;
    }

    /// Hash of the 4 bytes at `data`; callers guarantee lookahead.
    #[inline(always)]
    pub fn hash_bytes(data: &[u8]) -> u32 {
        hash32(load32(data), BUCKET_BITS)
    }

    /// Index position `ix`, whose bytes start at `data`.  The newest entry
    /// for a key always sits at `(num[key] - 1) & BLOCK_MASK`.
    #[inline]
    pub fn store(&mut self, data: &[u8], ix: usize) {
        let key = Self::hash_bytes(data) as usize;
        let minor_ix = self.num[key] as usize & Self::BLOCK_MASK;
        self.buckets[(key << BLOCK_BITS) + minor_ix] = ix as u32;
        self.num[key] = self.num[key].wrapping_add(1);
    }

    /// Index `len` consecutive positions starting at `start_ix`.
    pub fn store_range(&mut self, data: &[u8], len: usize, start_ix: usize, mask: usize) {
        for p in 0..len {
            self.store(&data[(start_ix + p) & mask..], start_ix + p);
        }
    }

    /// Search for a back-reference at `cur_ix` that strictly improves on
    /// `best`.  Requires 4 readable bytes at `cur_ix & ring_buffer_mask` and
    /// `max_length` bytes of lookahead there.
    #[allow(clippy::too_many_arguments)]
    pub fn find_longest_match(
        &mut self,
        data: &[u8],
        ring_buffer_mask: usize,
        dictionary: &StaticDictionary,
        distance_cache: &[i32; 4],
        cur_ix: usize,
        max_length: usize,
        max_backward: usize,
        best: &mut LongestMatch,
    ) -> bool {
        let cur_ix_masked = cur_ix & ring_buffer_mask;
        let mut best_score = best.score;
        let mut best_len = best.len;
        let mut match_found = false;

        // Recent distances first: short matches are acceptable here because
        // the short codes are so cheap to emit.
        for i in 0..NUM_LAST_DISTANCES {
            let backward =
                distance_cache[DISTANCE_CACHE_INDEX[i]] + DISTANCE_CACHE_OFFSET[i];
            if backward <= 0 || backward as usize > cur_ix {
                continue;
            }
            let backward = backward as usize;
            if unlikely(backward > max_backward) {
                continue;
            }
            let prev_ix = (cur_ix - backward) & ring_buffer_mask;
            if !tail_bytes_equal(data, prev_ix + best_len, cur_ix_masked + best_len) {
                continue;
            }
            let len = find_match_length_with_limit(
                &data[prev_ix..],
                &data[cur_ix_masked..],
                max_length,
            );
            if len >= 3 || (len == 2 && i < 2) {
                let score = backward_reference_score_using_last_distance(len, i);
                if best_score < score {
                    best_score = score;
                    best_len = len;
                    best.len = len;
                    best.len_code = len;
                    best.distance = backward;
                    best.score = score;
                    match_found = true;
                }
            }
        }

        // Bucket ring, newest first.
        let key = Self::hash_bytes(&data[cur_ix_masked..]) as usize;
        let bucket = &self.buckets[key << BLOCK_BITS..][..Self::BLOCK_SIZE];
        let num_key = self.num[key] as usize;
        let down = num_key.saturating_sub(Self::BLOCK_SIZE);
        let mut i = num_key;
        while i > down {
            i -= 1;
            let prev_ix = bucket[i & Self::BLOCK_MASK] as usize;
            let backward = cur_ix.wrapping_sub(prev_ix);
            if unlikely(backward > max_backward) {
                break;
            }
            if backward == 0 {
                continue;
            }
            let prev_masked = prev_ix & ring_buffer_mask;
            if !tail_bytes_equal(data, prev_masked + best_len, cur_ix_masked + best_len) {
                continue;
            }
            let len = find_match_length_with_limit(
                &data[prev_masked..],
                &data[cur_ix_masked..],
                max_length,
            );
            if len >= 4 {
                let score = backward_reference_score(len, backward);
                if best_score < score {
                    best_score = score;
                    best_len = len;
                    best.len = len;
                    best.len_code = len;
                    best.distance = backward;
                    best.score = score;
                    match_found = true;
                }
            }
        }

        if !match_found && self.num_dict_matches >= (self.num_dict_lookups >> 7) {
            let mut key = StaticDictionary::hash(&data[cur_ix_masked..]);
            for _ in 0..2 {
                self.num_dict_lookups += 1;
                if let Some(probe) =
                    dictionary.probe(&data[cur_ix_masked..], max_length, key)
                {
                    let backward = max_backward + probe.word_id + 1;
                    let score = backward_reference_score(probe.len, backward);
                    if best_score < score {
                        self.num_dict_matches += 1;
                        best_score = score;
                        best.len = probe.len;
                        best.len_code = probe.len_code;
                        best.distance = backward;
                        best.score = score;
                        match_found = true;
                    }
                }
                key += 1;
            }
        }
        match_found
    }

    /// Emit every strictly-length-increasing candidate at `cur_ix`, sorted
    /// by non-decreasing length then non-decreasing distance: a 64-position
    /// near scan (only while the best length is at most 2), the bucket ring,
    /// then dictionary candidates for the still-uncovered lengths.
    ///
    /// When any candidate reaches [`MAX_ZOPFLI_LEN`] the list collapses to
    /// that single match.  `matches` needs at least `MAX_ZOPFLI_LEN +
    /// MAX_DICTIONARY_MATCH_LEN` slots.
    #[allow(clippy::too_many_arguments)]
    pub fn find_all_matches(
        &self,
        data: &[u8],
        ring_buffer_mask: usize,
        dictionary: &StaticDictionary,
        cur_ix: usize,
        max_length: usize,
        max_backward: usize,
        matches: &mut [BackwardMatch],
    ) -> usize {
        let cur_ix_masked = cur_ix & ring_buffer_mask;
        let mut best_len = 1usize;
        let mut count = 0usize;

        // Near positions can hold matches too short to be hashed (length 2);
        // scan up to 64 back while nothing longer has been seen.
        let stop = cur_ix.saturating_sub(64);
        for i in (stop + 1..cur_ix).rev() {
            if best_len > 2 {
                break;
            }
            let backward = cur_ix - i;
            if unlikely(backward > max_backward) {
                break;
            }
            let prev_ix = i & ring_buffer_mask;
            if !tail_bytes_equal(data, prev_ix, cur_ix_masked)
                || !tail_bytes_equal(data, prev_ix + 1, cur_ix_masked + 1)
            {
                continue;
            }
            let len = find_match_length_with_limit(
                &data[prev_ix..],
                &data[cur_ix_masked..],
                max_length,
            );
            if len > best_len {
                best_len = len;
                if len >= MAX_ZOPFLI_LEN {
                    count = 0;
                }
                matches[count] = BackwardMatch::new(backward, len);
                count += 1;
            }
        }

        let key = Self::hash_bytes(&data[cur_ix_masked..]) as usize;
        let bucket = &self.buckets[key << BLOCK_BITS..][..Self::BLOCK_SIZE];
        let num_key = self.num[key] as usize;
        let down = num_key.saturating_sub(Self::BLOCK_SIZE);
        let mut i = num_key;
        while i > down {
            i -= 1;
            let prev_ix = bucket[i & Self::BLOCK_MASK] as usize;
            let backward = cur_ix.wrapping_sub(prev_ix);
            if unlikely(backward > max_backward) {
                break;
            }
            if backward == 0 {
                continue;
            }
            let prev_masked = prev_ix & ring_buffer_mask;
            if !tail_bytes_equal(data, prev_masked + best_len, cur_ix_masked + best_len) {
                continue;
            }
            let len = find_match_length_with_limit(
                &data[prev_masked..],
                &data[cur_ix_masked..],
                max_length,
            );
            if len > best_len {
                best_len = len;
                if len >= MAX_ZOPFLI_LEN {
                    count = 0;
                }
                matches[count] = BackwardMatch::new(backward, len);
                count += 1;
            }
        }

        let mut dict_matches = [INVALID_MATCH; MAX_DICTIONARY_MATCH_LEN + 1];
        let min_length = (best_len + 1).max(4);
        if dictionary.find_all_matches(
            &data[cur_ix_masked..],
            min_length,
            max_length,
            &mut dict_matches,
        ) {
            let max_len = MAX_DICTIONARY_MATCH_LEN.min(max_length);
            for l in min_length..=max_len {
                let dict_id = dict_matches[l];
                if dict_id < INVALID_MATCH {
                    matches[count] = BackwardMatch::with_code(
                        max_backward + (dict_id >> 5) as usize + 1,
                        l,
                        (dict_id & 31) as usize,
                    );
                    count += 1;
                }
            }
        }
        count
    }
}

impl<const BUCKET_BITS: u32, const BLOCK_BITS: u32, const NUM_LAST_DISTANCES: usize> Default
    for ChainMatcher<BUCKET_BITS, BLOCK_BITS, NUM_LAST_DISTANCES>
{
    fn default() -> Self {
        Self::new()
    }
}
