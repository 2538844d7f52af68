//! Binary-tree match finder (quality 10).
//!
//! Each 4-byte hash bucket holds the root of a binary tree of positions whose
//! first 4 bytes share that hash.  Every tree is ordered lexicographically by
//! the byte sequence starting at each node's position: left children are
//! lesser, right children greater.  Two auxiliary direct-mapped tables catch
//! length-2 and length-3 matches that the tree (minimum useful length 4)
//! cannot represent.
//!
//! Advancing by one byte does all of the following in a single traversal:
//! finds matches against the current sequence, splits the tree into its
//! lesser-than and greater-than halves, and hooks those halves under the
//! current position as the new root.  The `best_lt_len`/`best_gt_len`
//! counters carry the prefix already known from the ancestor chain, so no
//! byte is ever re-compared on the way down.

use crate::mem::{find_match_length_with_limit, load16, load32, to_u16, to_u24, unlikely};

use super::dict::{StaticDictionary, INVALID_MATCH, MAX_DICTIONARY_MATCH_LEN};
use super::score::backward_reference_score;
use super::types::{hash32, BackwardMatch, LongestMatch};

// ─────────────────────────────────────────────────────────────────────────────
// Hash-table geometry
// ─────────────────────────────────────────────────────────────────────────────

pub const HASH2_BITS: u32 = 10;
pub const HASH3_BITS: u32 = 15;
pub const HASH4_BITS: u32 = 17;

const HASH2_OFFSET: usize = 0;
const HASH3_OFFSET: usize = HASH2_OFFSET + (1 << HASH2_BITS);
const HASH4_OFFSET: usize = HASH3_OFFSET + (1 << HASH3_BITS);
const HASH_TOTAL_LENGTH: usize = HASH4_OFFSET + (1 << HASH4_BITS);

/// Binary-tree match finder over a `2^lgwin` window.
pub struct TreeMatcher {
    /// The window size minus one.
    pub window_mask: u32,
    /// Three packed subtables: length-2 and length-3 direct maps, then the
    /// tree roots keyed by the 4-byte hash.
    pub hash_tabs: Box<[u32]>,
    /// Two child references per window slot: `child_tab[2p]` is the left
    /// child of the node at position `p`, `child_tab[2p + 1]` the right.
    pub child_tab: Box<[u32]>,
    /// Bound on nodes visited per traversal.  Must be at least 1.
    pub max_search_depth: u32,
    /// Stop searching once a match of this length is found.
    pub nice_length: u32,
    scratch: Vec<BackwardMatch>,
}

impl TreeMatcher {
    /// Bytes read when indexing a position.
    pub const HASH_TYPE_LENGTH: usize = 4;

    pub fn new(lgwin: u32, max_search_depth: u32, nice_length: u32) -> Self {
        debug_assert!(max_search_depth >= 1);
        let window_mask = (1u32 << lgwin) - 1;
        let mut matcher = Self {
            window_mask,
            hash_tabs: vec![0u32; HASH_TOTAL_LENGTH].into_boxed_slice(),
            child_tab: vec![0u32; 2 * (window_mask as usize + 1)].into_boxed_slice(),
            max_search_depth,
            nice_length,
            scratch: vec![BackwardMatch::default(); nice_length as usize + 2],
        };
        matcher.reset();
        matcher
    }

    /// The sentinel stored in unseeded hash slots and cut tree edges:
    /// `-window_mask` as an unsigned value, which every distance check
    /// rejects as far out of window.  All consumers go through this helper.
    #[inline(always)]
    fn invalid_pos(&self) -> u32 {
        0u32.wrapping_sub(self.window_mask)
    }

    /// Forget all indexed positions.
    pub fn reset(&mut self) {
        let invalid = self.invalid_pos();
        self.hash_tabs.fill(invalid);
    }

    /// True when `prev` is too old (or a sentinel) to reference from `cur`.
    ///
    /// The 15-byte margin below the full window is kept verbatim: it is the
    /// safety slack for the prefix-match reads and unaligned loads near the
    /// window edge.
    #[inline(always)]
    fn out_of_window(&self, cur: u32, prev: u32) -> bool {
        cur.wrapping_sub(prev) > self.window_mask - 15
    }

    /// Advance the match finder past `cur_ix`, re-rooting that position's
    /// tree.  With `record` set, candidate matches are written to `matches`
    /// in strictly increasing length.
    ///
    /// Returns `(matches_written, best_len)`.  If fewer than `nice_length`
    /// bytes of lookahead remain the position is left out of the index
    /// entirely and `(0, 0)` is returned.
    pub fn advance_one_byte(
        &mut self,
        data: &[u8],
        ring_buffer_mask: usize,
        cur_ix: usize,
        max_length: usize,
        matches: &mut [BackwardMatch],
        record: bool,
    ) -> (usize, usize) {
        if unlikely(max_length < self.nice_length as usize) {
            return (0, 0);
        }

        let cur = cur_ix as u32;
        let cur_ix_masked = cur_ix & ring_buffer_mask;
        let nice_len = (self.nice_length as usize).min(max_length);
        let mut depth_remaining = self.max_search_depth;
        let mut best_len = 3usize;
        let mut count = 0usize;

        let seq4 = load32(&data[cur_ix_masked..]);
        let seq3 = to_u24(seq4);
        let seq2 = to_u16(seq4);

        // Length-2 match (direct map only).
        let slot2 = HASH2_OFFSET + hash32(seq2, HASH2_BITS) as usize;
        let prev2 = self.hash_tabs[slot2];
        self.hash_tabs[slot2] = cur;
        if record && !self.out_of_window(cur, prev2) {
            let prev_masked = prev2 as usize & ring_buffer_mask;
            if prev_masked + 2 <= data.len() && seq2 == u32::from(load16(&data[prev_masked..])) {
                matches[count] = BackwardMatch::new(cur.wrapping_sub(prev2) as usize, 2);
                count += 1;
            }
        }

        // Length-3 match (direct map only).
        let slot3 = HASH3_OFFSET + hash32(seq3, HASH3_BITS) as usize;
        let prev3 = self.hash_tabs[slot3];
        self.hash_tabs[slot3] = cur;
        if record && !self.out_of_window(cur, prev3) {
            let prev_masked = prev3 as usize & ring_buffer_mask;
            if prev_masked + 4 <= data.len() && seq3 == to_u24(load32(&data[prev_masked..])) {
                matches[count] = BackwardMatch::new(cur.wrapping_sub(prev3) as usize, 3);
                count += 1;
            }
        }

        // Length-4+ matches: the bucket holds the tree root; the current
        // position becomes the new root.
        let slot4 = HASH4_OFFSET + hash32(seq4, HASH4_BITS) as usize;
        let mut prev_ix = self.hash_tabs[slot4];
        self.hash_tabs[slot4] = cur;

        // Pending edges of the two half-trees being split off; they start at
        // the new root's own child slots.
        let mut pending_lt = 2 * (cur_ix & self.window_mask as usize);
        let mut pending_gt = pending_lt + 1;

        if self.out_of_window(cur, prev_ix) {
            let invalid = self.invalid_pos();
            self.child_tab[pending_lt] = invalid;
            self.child_tab[pending_gt] = invalid;
            return (count, best_len);
        }

        let mut best_lt_len = 0usize;
        let mut best_gt_len = 0usize;
        let mut len = 0usize;

        loop {
            let match_ix_masked = prev_ix as usize & ring_buffer_mask;
            let pair = 2 * (prev_ix as usize & self.window_mask as usize);

            // `len` bytes are already known equal from the ancestor chain.
            if data.get(match_ix_masked + len) == Some(&data[cur_ix_masked + len]) {
                len += 1;
                len += find_match_length_with_limit(
                    data.get(match_ix_masked + len..).unwrap_or(&[]),
                    &data[cur_ix_masked + len..],
                    max_length - len,
                );
                if !record {
                    if len >= nice_len {
                        let (left, right) =
                            (self.child_tab[pair], self.child_tab[pair + 1]);
                        self.child_tab[pending_lt] = left;
                        self.child_tab[pending_gt] = right;
                        return (count, best_len);
                    }
                } else if len > best_len {
                    best_len = len;
                    if len >= nice_len {
                        // Good enough: this match dominates the list.
                        count = 0;
                        matches[count] =
                            BackwardMatch::new(cur.wrapping_sub(prev_ix) as usize, len);
                        count += 1;
                        let (left, right) =
                            (self.child_tab[pair], self.child_tab[pair + 1]);
                        self.child_tab[pending_lt] = left;
                        self.child_tab[pending_gt] = right;
                        return (count, best_len);
                    }
                    matches[count] =
                        BackwardMatch::new(cur.wrapping_sub(prev_ix) as usize, len);
                    count += 1;
                }
            }

            // The bytes at `len` differ; descend towards the current
            // sequence, hooking the node onto the proper half-tree.
            let cur_byte = data[cur_ix_masked + len];
            let less = data
                .get(match_ix_masked + len)
                .map_or(true, |&b| b < cur_byte);
            if less {
                self.child_tab[pending_lt] = prev_ix;
                pending_lt = pair + 1;
                prev_ix = self.child_tab[pending_lt];
                best_lt_len = len;
                if best_gt_len < len {
                    len = best_gt_len;
                }
            } else {
                self.child_tab[pending_gt] = prev_ix;
                pending_gt = pair;
                prev_ix = self.child_tab[pending_gt];
                best_gt_len = len;
                if best_lt_len < len {
                    len = best_lt_len;
                }
            }

            depth_remaining -= 1;
            if self.out_of_window(cur, prev_ix) || depth_remaining == 0 {
                let invalid = self.invalid_pos();
                self.child_tab[pending_lt] = invalid;
                self.child_tab[pending_gt] = invalid;
                return (count, best_len);
            }
        }
    }

    /// Maintain the tree at a position whose matches are not wanted.
    pub fn skip_byte(
        &mut self,
        data: &[u8],
        ring_buffer_mask: usize,
        cur_ix: usize,
        max_length: usize,
    ) {
        self.advance_one_byte(data, ring_buffer_mask, cur_ix, max_length, &mut [], false);
    }

    /// Emit every candidate at `cur_ix` in strictly increasing length
    /// (non-decreasing distance among equals), then dictionary candidates
    /// for the still-uncovered lengths.  Collapses to a single entry when a
    /// match reaches `nice_length`.
    ///
    /// `matches` needs at least `nice_length + MAX_DICTIONARY_MATCH_LEN`
    /// slots.  Dictionary distances are based on the effective window,
    /// `min(cur_ix, window_mask - 15)`.
    pub fn find_all_matches(
        &mut self,
        data: &[u8],
        ring_buffer_mask: usize,
        dictionary: &StaticDictionary,
        cur_ix: usize,
        max_length: usize,
        matches: &mut [BackwardMatch],
    ) -> usize {
        if unlikely(max_length < self.nice_length as usize) {
            return 0;
        }
        let (mut count, best_len) =
            self.advance_one_byte(data, ring_buffer_mask, cur_ix, max_length, matches, true);

        let mut dict_matches = [INVALID_MATCH; MAX_DICTIONARY_MATCH_LEN + 1];
        let min_length = best_len + 1;
        if dictionary.find_all_matches(
            &data[cur_ix & ring_buffer_mask..],
            min_length,
            max_length,
            &mut dict_matches,
        ) {
            let base = cur_ix.min(self.window_mask as usize - 15);
            let max_len = MAX_DICTIONARY_MATCH_LEN.min(max_length);
            for l in min_length..=max_len {
                let dict_id = dict_matches[l];
                if dict_id < INVALID_MATCH {
                    matches[count] = BackwardMatch::with_code(
                        base + (dict_id >> 5) as usize + 1,
                        l,
                        (dict_id & 31) as usize,
                    );
                    count += 1;
                }
            }
        }
        count
    }

    /// Longest-match search expressed over the tree: advance with recording
    /// and keep the best generally-scored in-window candidate.  Updates
    /// `best` only on strict improvement.
    #[allow(clippy::too_many_arguments)]
    pub fn find_longest_match(
        &mut self,
        data: &[u8],
        ring_buffer_mask: usize,
        _dictionary: &StaticDictionary,
        _distance_cache: &[i32; 4],
        cur_ix: usize,
        max_length: usize,
        max_backward: usize,
        best: &mut LongestMatch,
    ) -> bool {
        let mut scratch = std::mem::take(&mut self.scratch);
        let count = self
            .advance_one_byte(data, ring_buffer_mask, cur_ix, max_length, &mut scratch, true)
            .0;

        let mut match_found = false;
        for m in &scratch[..count] {
            let backward = m.distance as usize;
            if backward == 0 || backward > max_backward {
                continue;
            }
            let len = m.length();
            let score = backward_reference_score(len, backward);
            if best.score < score {
                best.len = len;
                best.len_code = m.length_code();
                best.distance = backward;
                best.score = score;
                match_found = true;
            }
        }
        self.scratch = scratch;
        match_found
    }
}
