//! Quick match finders (qualities 1–4): a flat direct-mapped table probed
//! over a small sweep of consecutive slots.
//!
//! A 5-byte hash selects the bucket; storing spreads consecutive positions
//! over `SWEEP` adjacent slots with the `(ix >> 3) % SWEEP` wiggle, which
//! keeps several recent positions alive under one key without any chaining.
//! Search order: the last emitted distance first, then the sweep, then — on
//! the dictionary-carrying variants — one static-dictionary slot, throttled
//! to positions where dictionary lookups have been paying off.

use crate::mem::{find_match_length_with_limit, unlikely};

use super::dict::{StaticDictionary, INVALID_MATCH, MAX_DICTIONARY_MATCH_LEN};
use super::score::{backward_reference_score, backward_reference_score_using_last_distance};
use super::types::{hash5, tail_bytes_equal, BackwardMatch, LongestMatch, MAX_ZOPFLI_LEN};

/// Direct-mapped match finder with a `SWEEP`-slot probe.
///
/// `BUCKET_BITS` sizes the table at `2^BUCKET_BITS + SWEEP` position slots;
/// `SWEEP` must be a power of two.  `USE_DICTIONARY` enables the static
/// dictionary fallback.
pub struct QuickMatcher<const BUCKET_BITS: u32, const SWEEP: u32, const USE_DICTIONARY: bool> {
    /// Slot values are positions; 0 means "unseeded".
    pub buckets: Box<[u32]>,
    pub num_dict_lookups: usize,
    pub num_dict_matches: usize,
}

impl<const BUCKET_BITS: u32, const SWEEP: u32, const USE_DICTIONARY: bool>
    QuickMatcher<BUCKET_BITS, SWEEP, USE_DICTIONARY>
{
    /// Bytes hashed by [`Self::hash_bytes`].
    pub const HASH_LENGTH: usize = 5;
    /// Bytes read when storing a position.
    pub const HASH_TYPE_LENGTH: usize = 8;

    const BUCKET_SIZE: usize = 1 << BUCKET_BITS;

    pub fn new() -> Self {
        debug_assert!(SWEEP.is_power_of_two());
        Self {
            buckets: vec![0u32; Self::BUCKET_SIZE + SWEEP as usize].into_boxed_slice(),
            num_dict_lookups: 0,
            num_dict_matches: 0,
        }
    }

    /// Forget all indexed positions.
    ///
    /// Unseeded slots read as position 0, which the degenerate-distance check
    /// rejects; leaving stale entries would make fresh streams find
    /// accidental matches.
    pub fn reset(&mut self) {
        self.buckets.fill(0);
        self.num_dict_lookups = 0;
        self.num_dict_matches = 0;
    }

    /// Hash of the 5 bytes at `data` (reads 8; callers guarantee lookahead).
    #[inline(always)]
    pub fn hash_bytes(data: &[u8]) -> u32 {
        hash5(data, BUCKET_BITS)
    }

    /// Index position `ix`, whose bytes start at `data`.
    ///
    /// The `(ix >> 3) % SWEEP` wiggle spreads nearby positions over the sweep
    /// range so a hot key retains more than one candidate.
    #[inline]
    pub fn store(&mut self, data: &[u8], ix: usize) {
        let key = Self::hash_bytes(data) as usize;
        let off = (ix >> 3) % SWEEP as usize;
        self.buckets[key + off] = ix as u32;
    }

    /// Index `len` consecutive positions starting at `start_ix`.
    pub fn store_range(&mut self, data: &[u8], len: usize, start_ix: usize, mask: usize) {
        for p in 0..len {
            self.store(&data[(start_ix + p) & mask..], start_ix + p);
        }
    }

    /// Search for a back-reference at `cur_ix` that strictly improves on
    /// `best`.  Candidate order: the last emitted distance, then the bucket
    /// sweep, then (if enabled and not yet matched) the static dictionary.
    ///
    /// Reads 8 bytes at `cur_ix & ring_buffer_mask`; callers guarantee
    /// lookahead of at least `max_length` bytes there.
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
        let best_len_in = best.len;
        let cur_ix_masked = cur_ix & ring_buffer_mask;
        let mut best_score = best.score;
        let mut best_len = best_len_in;
        let mut match_found = false;

        // Last emitted distance first: repeats encode in very few bits, so a
        // 4-byte hit here already beats most sweep candidates.
        let cached = distance_cache[0];
        if cached > 0 && cached as usize <= cur_ix {
            let backward = cached as usize;
            let prev_ix = (cur_ix - backward) & ring_buffer_mask;
            if tail_bytes_equal(data, prev_ix + best_len, cur_ix_masked + best_len) {
                let len = find_match_length_with_limit(
                    &data[prev_ix..],
                    &data[cur_ix_masked..],
                    max_length,
                );
                if len >= 4 {
                    let score = backward_reference_score_using_last_distance(len, 0);
                    if best_score < score {
                        best_score = score;
                        best_len = len;
                        best.len = len;
                        best.len_code = len;
                        best.distance = backward;
                        best.score = score;
                        if SWEEP == 1 {
                            return true;
                        }
                        match_found = true;
                    }
                }
            }
        }

        let key = Self::hash_bytes(&data[cur_ix_masked..]) as usize;
        if SWEEP == 1 {
            // Single probe; no loop set-up.
            let prev_ix = self.buckets[key] as usize;
            let backward = cur_ix.wrapping_sub(prev_ix);
            let prev_masked = prev_ix & ring_buffer_mask;
            if !tail_bytes_equal(data, prev_masked + best_len_in, cur_ix_masked + best_len_in) {
                return false;
            }
            if unlikely(backward == 0 || backward > max_backward) {
                return false;
            }
            let len = find_match_length_with_limit(
                &data[prev_masked..],
                &data[cur_ix_masked..],
                max_length,
            );
            if len >= 4 {
                let score = backward_reference_score(len, backward);
                if best_score < score {
                    best.len = len;
                    best.len_code = len;
                    best.distance = backward;
                    best.score = score;
                    return true;
                }
            }
        } else {
            for i in 0..SWEEP as usize {
                let prev_ix = self.buckets[key + i] as usize;
                let backward = cur_ix.wrapping_sub(prev_ix);
                let prev_masked = prev_ix & ring_buffer_mask;
                if !tail_bytes_equal(data, prev_masked + best_len, cur_ix_masked + best_len) {
                    continue;
                }
                if unlikely(backward == 0 || backward > max_backward) {
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
        }

        if USE_DICTIONARY && !match_found && self.num_dict_matches >= (self.num_dict_lookups >> 7)
        {
            self.num_dict_lookups += 1;
            let key = StaticDictionary::hash(&data[cur_ix_masked..]);
            if let Some(probe) = dictionary.probe(&data[cur_ix_masked..], max_length, key) {
                let backward = max_backward + probe.word_id + 1;
                let score = backward_reference_score(probe.len, backward);
                if best_score < score {
                    self.num_dict_matches += 1;
                    best.len = probe.len;
                    best.len_code = probe.len_code;
                    best.distance = backward;
                    best.score = score;
                    return true;
                }
            }
        }
        match_found
    }

    /// Emit every strictly-length-increasing candidate visible to this
    /// strategy (the sweep, then the dictionary), sorted by non-decreasing
    /// length.  Returns the number of matches written.
    #[allow(clippy::too_many_arguments)]
    pub fn find_all_matches(
        &mut self,
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

        let key = Self::hash_bytes(&data[cur_ix_masked..]) as usize;
        for i in 0..SWEEP as usize {
            let prev_ix = self.buckets[key + i] as usize;
            let backward = cur_ix.wrapping_sub(prev_ix);
            if backward == 0 || unlikely(backward > max_backward) {
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
            if len >= 4 && len > best_len {
                best_len = len;
                if len >= MAX_ZOPFLI_LEN {
                    count = 0;
                }
                matches[count] = BackwardMatch::new(backward, len);
                count += 1;
            }
        }

        if USE_DICTIONARY {
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
        }
        count
    }
}

impl<const BUCKET_BITS: u32, const SWEEP: u32, const USE_DICTIONARY: bool> Default
    for QuickMatcher<BUCKET_BITS, SWEEP, USE_DICTIONARY>
{
    fn default() -> Self {
        Self::new()
    }
}
