//! Static-dictionary probe: synthesizes back-references against a built-in
//! word list, encoded as distances beyond the real window.
//!
//! The dictionary itself is caller-supplied data — four read-only tables
//! borrowed through [`StaticDictionary`].  A 14-bit hash of the current 4
//! bytes selects a pair of packed `(slot, length)` entries; a prefix match
//! against the referenced word, allowed to fall short by up to 9 bytes, maps
//! the shortfall through the cutoff-transform table to a transform id and
//! thus to a virtual word id.  The caller turns a word id into a distance as
//! `max_backward + word_id + 1`, which the decoder recognises as a
//! dictionary reference because it lies beyond every real back-reference.

use crate::mem::{find_match_length_with_limit, load32};

use super::types::hash32;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Number of cutoff transforms; equivalently, the largest allowed shortfall
/// plus one.
pub const CUTOFF_TRANSFORMS_COUNT: usize = 10;

/// Transform id for each shortfall `declared_len - matched_len` in `0..10`.
pub static CUTOFF_TRANSFORMS: [u32; CUTOFF_TRANSFORMS_COUNT] =
    [0, 12, 27, 23, 42, 63, 56, 48, 59, 64];

/// Longest copy a dictionary word (plus transform) can produce.
pub const MAX_DICTIONARY_MATCH_LEN: usize = 37;

/// Sentinel for "no dictionary match at this length" in the per-length table
/// filled by [`StaticDictionary::find_all_matches`].
pub const INVALID_MATCH: u32 = 0x0FFF_FFFF;

/// Width of the dictionary hash; the packed table holds `2 << 14` entries
/// (two per hash value).
pub const DICTIONARY_HASH_BITS: u32 = 14;

// ─────────────────────────────────────────────────────────────────────────────
// StaticDictionary
// ─────────────────────────────────────────────────────────────────────────────

/// Borrowed view of the four dictionary tables.
///
/// Entries of `hash_table` pack an 11-bit word slot in the high bits and a
/// 5-bit word length in the low bits; 0 means "empty".  The word of length
/// `len` at slot `s` starts at `offsets_by_length[len] + len * s` in `words`.
/// `size_bits_by_length[len]` is the log2 slot count for that length, used
/// to stack transformed copies of the word space.
pub struct StaticDictionary<'a> {
    pub hash_table: &'a [u16],
    pub words: &'a [u8],
    pub offsets_by_length: &'a [u32],
    pub size_bits_by_length: &'a [u8],
}

/// One accepted dictionary candidate.
///
/// `len` is the matched prefix length, `len_code` the declared word length
/// (what the decoder needs to locate the word), and `word_id` the
/// transform-adjusted slot from which the caller derives the virtual
/// distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictionaryProbe {
    pub len: usize,
    pub len_code: usize,
    pub word_id: usize,
}

impl<'a> StaticDictionary<'a> {
    /// A dictionary with no words; every probe misses.
    pub fn empty() -> StaticDictionary<'static> {
        static EMPTY_HASH: [u16; 2 << DICTIONARY_HASH_BITS] = [0; 2 << DICTIONARY_HASH_BITS];
        static EMPTY_OFFSETS: [u32; 32] = [0; 32];
        static EMPTY_SIZE_BITS: [u8; 32] = [0; 32];
        StaticDictionary {
            hash_table: &EMPTY_HASH,
            words: &[],
            offsets_by_length: &EMPTY_OFFSETS,
            size_bits_by_length: &EMPTY_SIZE_BITS,
        }
    }

    /// Hash of the 4 bytes at `data`, shifted left by 1 to index the paired
    /// table.  Reads 4 bytes; callers guarantee lookahead.
    #[inline]
    pub fn hash(data: &[u8]) -> u32 {
        hash32(load32(data), DICTIONARY_HASH_BITS) << 1
    }

    /// Probe a single packed slot `key` against the bytes at `data`.
    ///
    /// Accepts when the prefix match `m` against the declared word of length
    /// `len` satisfies `m > len - 10` and `m > 0`; the shortfall selects the
    /// cutoff transform that makes up the difference.
    pub fn probe(&self, data: &[u8], max_length: usize, key: u32) -> Option<DictionaryProbe> {
        let entry = *self.hash_table.get(key as usize)?;
        if entry == 0 {
            return None;
        }
        let len = (entry & 31) as usize;
        let slot = (entry >> 5) as usize;
        if len > max_length {
            return None;
        }
        let offset = *self.offsets_by_length.get(len)? as usize + len * slot;
        let word = self.words.get(offset..offset + len)?;
        let matchlen = find_match_length_with_limit(data, word, len);
        if matchlen + CUTOFF_TRANSFORMS_COUNT <= len || matchlen == 0 {
            return None;
        }
        let transform_id = CUTOFF_TRANSFORMS[len - matchlen] as usize;
        let word_id = (transform_id << self.size_bits_by_length[len]) + slot;
        Some(DictionaryProbe {
            len: matchlen,
            len_code: len,
            word_id,
        })
    }

    /// Collect the best dictionary candidate for every length in
    /// `min_length..=max_length`, writing packed `(word_id << 5) | len_code`
    /// values into `matches` (pre-filled with [`INVALID_MATCH`] by the
    /// caller).  Probes the two adjacent slots of the hash pair.
    ///
    /// Returns whether any entry was written.
    pub fn find_all_matches(
        &self,
        data: &[u8],
        min_length: usize,
        max_length: usize,
        matches: &mut [u32; MAX_DICTIONARY_MATCH_LEN + 1],
    ) -> bool {
        if min_length > MAX_DICTIONARY_MATCH_LEN {
            return false;
        }
        let mut found = false;
        let mut key = Self::hash(data);
        for _ in 0..2 {
            if let Some(&entry) = self.hash_table.get(key as usize) {
                if entry != 0 {
                    found |= self.record_lengths(data, entry, min_length, max_length, matches);
                }
            }
            key += 1;
        }
        found
    }

    /// Expand one packed hash entry into per-length candidates.
    fn record_lengths(
        &self,
        data: &[u8],
        entry: u16,
        min_length: usize,
        max_length: usize,
        matches: &mut [u32; MAX_DICTIONARY_MATCH_LEN + 1],
    ) -> bool {
        let len = (entry & 31) as usize;
        let slot = (entry >> 5) as usize;
        let offset = match self.offsets_by_length.get(len) {
            Some(&off) => off as usize + len * slot,
            None => return false,
        };
        let word = match self.words.get(offset..offset + len) {
            Some(w) => w,
            None => return false,
        };
        let matchlen = find_match_length_with_limit(data, word, len);

        let mut found = false;
        let upper = matchlen.min(max_length);
        for l in min_length..=upper.min(MAX_DICTIONARY_MATCH_LEN) {
            // Shortfall decides the transform; beyond 9 there is none.
            let shortfall = len - l;
            if shortfall >= CUTOFF_TRANSFORMS_COUNT {
                continue;
            }
            let transform_id = CUTOFF_TRANSFORMS[shortfall] as usize;
            let word_id = (transform_id << self.size_bits_by_length[len]) + slot;
            let packed = ((word_id << 5) | len) as u32;
            if packed < matches[l] {
                matches[l] = packed;
                found = true;
            }
        }
        found
    }
}
