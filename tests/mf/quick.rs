// Unit tests for the quick match finders (H1-H4 configurations).
//
// Coverage:
//   - store: sweep wiggle spreads positions across adjacent slots
//   - find_longest_match: repeat data, unique data, fresh table at position 0
//   - last-distance fast path and its score
//   - dictionary fallback on the sweep-1 variant, throttle gate
//   - find_all_matches: sweep candidates plus dictionary tail

use brotlir::mf::dict::StaticDictionary;
use brotlir::mf::quick::QuickMatcher;
use brotlir::mf::score::backward_reference_score_using_last_distance;
use brotlir::mf::types::{BackwardMatch, LongestMatch};

type H1 = QuickMatcher<16, 1, true>;
type H2 = QuickMatcher<16, 2, false>;
type H3 = QuickMatcher<16, 4, false>;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

struct DictTables {
    hash: Vec<u16>,
    words: Vec<u8>,
    offsets: Vec<u32>,
    size_bits: Vec<u8>,
}

impl DictTables {
    fn as_dict(&self) -> StaticDictionary<'_> {
        StaticDictionary {
            hash_table: &self.hash,
            words: &self.words,
            offsets_by_length: &self.offsets,
            size_bits_by_length: &self.size_bits,
        }
    }
}

/// One length-6 word ("winter", slot 1) reachable from the even hash slot.
fn winter_tables() -> DictTables {
    let mut hash = vec![0u16; 2 << 14];
    let mut offsets = vec![0u32; 32];
    let mut size_bits = vec![0u8; 32];
    offsets[6] = 0;
    size_bits[6] = 1;
    let key = StaticDictionary::hash(b"wint");
    hash[key as usize] = (1 << 5) | 6;
    DictTables {
        hash,
        words: b"globalwinter".to_vec(),
        offsets,
        size_bits,
    }
}

fn no_dict() -> StaticDictionary<'static> {
    StaticDictionary::empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// store
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn store_spreads_positions_with_the_sweep_wiggle() {
    let mut h = H2::new();
    let data = b"abcdefghijklmnop";
    let key = H2::hash_bytes(data) as usize;
    // (ix >> 3) % 2 alternates every 8 positions.
    h.store(data, 16);
    assert_eq!(h.buckets[key], 16, "ix=16 lands at offset (16>>3)%2 == 0");
    h.store(data, 8);
    assert_eq!(h.buckets[key + 1], 8, "ix=8 lands at offset (8>>3)%2 == 1");
    assert_eq!(h.buckets[key], 16, "offset-0 slot must survive");
}

#[test]
fn reset_unseeds_every_slot() {
    let mut h = H3::new();
    h.store(b"abcdefgh", 12345);
    h.num_dict_lookups = 7;
    h.reset();
    assert!(h.buckets.iter().all(|&b| b == 0));
    assert_eq!(h.num_dict_lookups, 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// find_longest_match
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn repeat_unit_is_found_through_the_bucket() {
    // "abcdefgh" repeated; position 8 matches position 0 for 8 bytes.
    let data = b"abcdefghabcdefgh";
    let mut h = H3::new();
    for p in 0..8 {
        h.store(&data[p..], p);
    }
    let mut best = LongestMatch::default();
    let found = h.find_longest_match(
        data,
        31,
        &no_dict(),
        &[0; 4],
        8,
        8,
        64,
        &mut best,
    );
    assert!(found);
    assert_eq!(best.distance, 8);
    assert_eq!(best.len, 8);
    assert!(best.score > 0.0);
}

#[test]
fn unique_data_finds_nothing() {
    let data: Vec<u8> = (0u8..64).collect();
    let mut h = H2::new();
    for p in 0..16 {
        h.store(&data[p..], p);
    }
    let mut best = LongestMatch::default();
    let found = h.find_longest_match(&data, 63, &no_dict(), &[0; 4], 16, 8, 64, &mut best);
    assert!(!found);
    assert_eq!(best.len, 0, "outputs must stay untouched without a match");
}

#[test]
fn fresh_table_finds_nothing_at_position_zero() {
    let data = b"abcdefghabcdefgh";
    let mut h = H2::new();
    let mut best = LongestMatch::default();
    assert!(!h.find_longest_match(data, 31, &no_dict(), &[0; 4], 0, 8, 64, &mut best));
}

#[test]
fn last_distance_path_fires_first_and_scores_as_short_code_zero() {
    // distance_cache[0] = 4 and a 8-byte match at that distance.
    let data = b"abcdabcdabcdabcd";
    let mut h = H1::new();
    let mut best = LongestMatch::default();
    let found = h.find_longest_match(
        data,
        31,
        &no_dict(),
        &[4, 0, 0, 0],
        8,
        8,
        64,
        &mut best,
    );
    assert!(found);
    assert_eq!(best.distance, 4);
    assert_eq!(best.len, 8);
    let expected = backward_reference_score_using_last_distance(8, 0);
    assert!((best.score - expected).abs() < 1e-9, "got {}", best.score);
}

#[test]
fn dictionary_backs_up_an_empty_window() {
    // Window holds one unrelated position sharing only the first byte, so
    // the bucket probe yields a too-short candidate and falls through to the
    // dictionary.
    let t = winter_tables();
    let data = b"wXYZABCDwinterQQ";
    let mut h = H1::new();
    h.store(&data[0..], 0);
    let mut best = LongestMatch::default();
    let found = h.find_longest_match(
        data,
        31,
        &t.as_dict(),
        &[0; 4],
        8,
        6,
        64,
        &mut best,
    );
    assert!(found, "dictionary hit expected");
    // distance = max_backward + transform 0 * 2^size_bits + slot + 1
    assert_eq!(best.distance, 64 + 1 + 1);
    assert_eq!(best.len, 6);
    assert_eq!(best.len_code, 6);
    assert_eq!(h.num_dict_lookups, 1);
    assert_eq!(h.num_dict_matches, 1);
}

#[test]
fn dictionary_probe_is_throttled_after_sustained_misses() {
    let t = winter_tables();
    let data = b"wXYZABCDwinterQQ";
    let mut h = H1::new();
    h.store(&data[0..], 0);
    // 128 prior lookups without a single match close the gate.
    h.num_dict_lookups = 128;
    h.num_dict_matches = 0;
    let mut best = LongestMatch::default();
    let found = h.find_longest_match(data, 31, &t.as_dict(), &[0; 4], 8, 6, 64, &mut best);
    assert!(!found, "gated probe must not fire");
    assert_eq!(h.num_dict_lookups, 128, "a gated probe counts no lookup");
}

#[test]
fn better_scoring_sweep_candidate_wins() {
    // Two candidates under the same key (the hash covers 5 bytes, and both
    // stored positions share "abcde"): an 8-byte match far away and a 5-byte
    // match nearby.  The sweep must keep the higher-scoring one.
    let mut data = vec![0u8; 1 << 12];
    data[0..8].copy_from_slice(b"abcdefgh"); // stored at ix 0 (sweep slot 0)
    data[8..16].copy_from_slice(b"abcdeXYZ"); // stored at ix 8 (sweep slot 1)
    data[3000..3008].copy_from_slice(b"abcdefgh"); // cur position
    let mut h = H2::new();
    h.store(&data[0..], 0);
    h.store(&data[8..], 8);
    let mut best = LongestMatch::default();
    let found = h.find_longest_match(
        &data,
        (1 << 12) - 1,
        &no_dict(),
        &[0; 4],
        3000,
        8,
        4000,
        &mut best,
    );
    assert!(found);
    assert_eq!(best.len, 8, "the 8-byte candidate scores above the 5-byte one");
    assert_eq!(best.distance, 3000);
}

// ─────────────────────────────────────────────────────────────────────────────
// find_all_matches
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn find_all_emits_sweep_candidates_with_increasing_length() {
    let data = b"abcdefghabcdefgh";
    let mut h = H3::new();
    for p in 0..8 {
        h.store(&data[p..], p);
    }
    let mut matches = [BackwardMatch::default(); 64];
    let n = h.find_all_matches(data, 31, &no_dict(), 8, 8, 64, &mut matches);
    assert!(n >= 1);
    for w in matches[..n].windows(2) {
        assert!(w[0].length() < w[1].length(), "lengths must strictly increase");
    }
    assert!(matches[..n].iter().any(|m| m.distance == 8 && m.length() == 8));
}
