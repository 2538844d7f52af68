// Unit tests for the shared match-finder types.
//
// Coverage:
//   - BackwardMatch: packing, code-equals-length collapse, accessors
//   - hash32/hash5: width, determinism, 5-byte window independence
//   - tail_bytes_equal: equality, mismatch, out-of-view indices

use brotlir::mf::types::{hash32, hash5, tail_bytes_equal, BackwardMatch};

// ─────────────────────────────────────────────────────────────────────────────
// BackwardMatch
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn backward_match_plain_copy() {
    let m = BackwardMatch::new(17, 9);
    assert_eq!(m.distance, 17);
    assert_eq!(m.length(), 9);
    assert_eq!(m.length_code(), 9);
    assert_eq!(m.length_and_code & 31, 0, "same-as-length code must pack as 0");
}

#[test]
fn backward_match_distinct_code() {
    let m = BackwardMatch::with_code(1000, 4, 6);
    assert_eq!(m.length(), 4);
    assert_eq!(m.length_code(), 6);
}

#[test]
fn backward_match_with_code_collapses_equal_code() {
    let m = BackwardMatch::with_code(1000, 6, 6);
    assert_eq!(m.length_and_code & 31, 0);
    assert_eq!(m.length_code(), 6);
}

// ─────────────────────────────────────────────────────────────────────────────
// Hashes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hash32_fits_requested_width() {
    for bits in [10u32, 14, 15, 17] {
        for word in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
            assert!(hash32(word, bits) < (1 << bits), "bits={bits} word={word:#x}");
        }
    }
}

#[test]
fn hash32_uses_multiplier_top_bits() {
    let word = 0x0102_0304u32;
    let expected = word.wrapping_mul(0x1E35_A7BD) >> (32 - 14);
    assert_eq!(hash32(word, 14), expected);
}

#[test]
fn hash5_fits_requested_width() {
    let data = b"abcdefgh";
    for bits in [16u32, 17] {
        assert!(hash5(data, bits) < (1 << bits));
    }
}

#[test]
fn hash5_ignores_bytes_past_the_fifth() {
    // Shifting the 64-bit load left by 24 discards the top 3 bytes.
    let a = b"abcdeXYZ";
    let b = b"abcdeQRS";
    assert_eq!(hash5(a, 16), hash5(b, 16));
}

#[test]
fn hash5_depends_on_fifth_byte() {
    let a = b"abcdeXYZ";
    let b = b"abcdfXYZ";
    assert_ne!(hash5(a, 16), hash5(b, 16));
}

// ─────────────────────────────────────────────────────────────────────────────
// tail_bytes_equal
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tail_bytes_equal_basic() {
    let data = b"abcabc";
    assert!(tail_bytes_equal(data, 0, 3));
    assert!(!tail_bytes_equal(data, 0, 1));
}

#[test]
fn tail_bytes_equal_rejects_out_of_view() {
    let data = b"aaaa";
    assert!(!tail_bytes_equal(data, 0, 4), "index past the end is a mismatch");
    assert!(!tail_bytes_equal(data, 9, 10), "both past the end is a mismatch");
}
