// Unit tests for the quality dispatcher and the uniform contract.
//
// Coverage:
//   - quality -> strategy mapping, clamping, per-family lookahead
//   - store/store_range through the front end, including the tree skip path
//   - find_longest_match / find_all_matches across families
//   - custom-dictionary warmup, its lookahead bound, and the quality-10
//     "unsupported" contract

use brotlir::mf::dict::StaticDictionary;
use brotlir::mf::dispatch::{MatchFinder, MatchFinderError, QUALITY_MAX, QUALITY_MIN};
use brotlir::mf::types::{BackwardMatch, LongestMatch};

fn no_dict() -> StaticDictionary<'static> {
    StaticDictionary::empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn each_quality_selects_its_own_strategy() {
    for q in QUALITY_MIN..=QUALITY_MAX {
        let m = MatchFinder::new(q, 22);
        assert_eq!(m.quality(), q);
    }
}

#[test]
fn quality_is_clamped_to_the_supported_range() {
    assert_eq!(MatchFinder::new(-3, 22).quality(), 1);
    assert_eq!(MatchFinder::new(0, 22).quality(), 1);
    assert_eq!(MatchFinder::new(99, 22).quality(), 10);
}

#[test]
fn store_lookahead_depends_on_the_family() {
    assert_eq!(MatchFinder::new(1, 22).hash_type_length(), 8);
    assert_eq!(MatchFinder::new(4, 22).hash_type_length(), 8);
    assert_eq!(MatchFinder::new(5, 22).hash_type_length(), 4);
    assert_eq!(MatchFinder::new(9, 22).hash_type_length(), 4);
    assert_eq!(MatchFinder::new(10, 22).hash_type_length(), 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Uniform operations
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_quality_finds_the_repeat_unit() {
    // 64-byte period, enough history for any strategy including the tree.
    // Only the period-aligned positions are indexed, so every strategy holds
    // the same candidate set.
    let unit: Vec<u8> = (0u8..64).collect();
    let data: Vec<u8> = unit.iter().cycle().take(1024).copied().collect();
    for q in QUALITY_MIN..=QUALITY_MAX {
        let mut m = MatchFinder::new(q, 10);
        for p in (0..512).step_by(64) {
            m.store(&data, 1023, p);
        }
        let mut best = LongestMatch::default();
        let found = m.find_longest_match(
            &data,
            1023,
            &no_dict(),
            &[0; 4],
            512,
            64,
            512,
            &mut best,
        );
        assert!(found, "quality {q} must find the period-64 repeat");
        assert_eq!(best.distance % 64, 0, "quality {q}");
        assert!(best.len >= 4, "quality {q}");
        assert!(best.score > 0.0, "quality {q}");
    }
}

#[test]
fn store_range_equals_store_per_position() {
    let data: Vec<u8> = (0u8..=255).cycle().take(256).collect();
    let mut a = MatchFinder::new(6, 22);
    let mut b = MatchFinder::new(6, 22);
    a.store_range(&data, 128, 0, 255);
    for p in 0..128 {
        b.store(&data, 255, p);
    }
    match (&a, &b) {
        (MatchFinder::H6(x), MatchFinder::H6(y)) => {
            assert_eq!(x.num, y.num);
            assert_eq!(x.buckets, y.buckets);
        }
        _ => unreachable!("quality 6 must map to H6"),
    }
}

#[test]
fn find_all_matches_is_uniform_across_families() {
    let unit: Vec<u8> = (0u8..64).collect();
    let data: Vec<u8> = unit.iter().cycle().take(1024).copied().collect();
    let mut matches = vec![BackwardMatch::default(); 512];
    for q in [2, 5, 10] {
        let mut m = MatchFinder::new(q, 10);
        for p in (0..512).step_by(64) {
            m.store(&data, 1023, p);
        }
        let n = m.find_all_matches(&data, 1023, &no_dict(), 512, 512, 512, &mut matches);
        assert!(n >= 1, "quality {q} must surface the repeat");
        for w in matches[..n].windows(2) {
            assert!(w[0].length() < w[1].length(), "quality {q}");
        }
    }
}

#[test]
fn reset_clears_every_family() {
    // The query position holds bytes that appear nowhere else, so no honest
    // candidate exists; anything found after reset would be stale state.
    let mut data: Vec<u8> = (0..1024usize).map(|i| (i % 64) as u8).collect();
    data[256..264].copy_from_slice(b"ZZZZZZZZ");
    for q in [2, 7, 10] {
        let mut m = MatchFinder::new(q, 10);
        for p in 0..256 {
            m.store(&data, 1023, p);
        }
        m.reset();
        let mut best = LongestMatch::default();
        let found = m.find_longest_match(
            &data,
            1023,
            &no_dict(),
            &[0; 4],
            256,
            64,
            256,
            &mut best,
        );
        assert!(!found, "quality {q} must forget its history on reset");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Custom dictionary
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn custom_dictionary_positions_become_referenceable() {
    // View = dictionary bytes followed by the stream; the stream's first
    // bytes repeat the dictionary's, at a distance of its full length.
    let mut data = vec![0u8; 64];
    data[..32].copy_from_slice(b"the quick brown fox jumps over t");
    data[32..48].copy_from_slice(b"the quick brown ");
    let mut m = MatchFinder::new(5, 22);
    m.prepend_custom_dictionary(&data[..32]).expect("warmup supported");
    let mut best = LongestMatch::default();
    let found = m.find_longest_match(
        &data,
        63,
        &no_dict(),
        &[0; 4],
        32,
        8,
        32,
        &mut best,
    );
    assert!(found, "stream start must match into the prepended dictionary");
    assert_eq!(best.distance, 32);
    assert!(best.len >= 8);
}

#[test]
fn warmup_skips_positions_without_full_lookahead() {
    // Quick matchers read 8 bytes per store; a 10-byte dictionary has only
    // three valid starting positions.
    let dict = b"abcdefghij";
    let mut m = MatchFinder::new(2, 22);
    m.prepend_custom_dictionary(dict).expect("warmup supported");
    if let MatchFinder::H2(h) = &m {
        let stored: Vec<u32> = h.buckets.iter().copied().filter(|&b| b != 0).collect();
        assert!(stored.iter().all(|&ix| ix <= 2), "only positions 0..=2 have 8 bytes");
    } else {
        unreachable!();
    }
}

#[test]
fn tree_strategy_reports_custom_dictionary_as_unsupported() {
    let mut m = MatchFinder::new(10, 22);
    let err = m.prepend_custom_dictionary(b"abcdefgh").unwrap_err();
    assert_eq!(err, MatchFinderError::CustomDictionaryUnsupported);
    assert!(err.to_string().contains("custom dictionary"));
}

#[test]
fn tiny_custom_dictionary_is_a_no_op() {
    let mut m = MatchFinder::new(2, 22);
    m.prepend_custom_dictionary(b"abc").expect("short dictionaries are fine");
    if let MatchFinder::H2(h) = &m {
        assert!(h.buckets.iter().all(|&b| b == 0));
    } else {
        unreachable!();
    }
}
