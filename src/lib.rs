//! `brotlir` — the LZ77 match-finding core of a Brotli-family compressor.
//!
//! For each position of an input stream the core proposes `(distance,
//! length)` back-references for a downstream entropy coder, using one of
//! three index-structure families selected by a compression quality level:
//! a direct-mapped quick table, hash buckets with ring-buffered per-key
//! history, or a binary tree re-rooted at every position.
//!
//! # Crate layout
//!
//! | Module         | Contents |
//! |----------------|----------|
//! | `mem`          | Unaligned little-endian loads, loaded-word narrowing, prefix-match counting. |
//! | `mf::types`    | Packed back-reference values, hash helpers, shared constants. |
//! | `mf::score`    | Candidate scoring and the recent-distance short-code tables. |
//! | `mf::dict`     | Static-dictionary probe over caller-supplied tables. |
//! | `mf::quick`    | Direct-mapped matchers with a small bucket sweep (qualities 1–4). |
//! | `mf::chain`    | Hash buckets ring-buffering per-key history (qualities 5–9). |
//! | `mf::tree`     | Binary-tree matcher with re-rooting traversal (quality 10). |
//! | `mf::dispatch` | Quality → strategy mapping and the uniform front end. |
//!
//! The stream itself is owned elsewhere: callers hand every operation a
//! read-only byte view plus a power-of-two ring mask, and the byte at
//! position `p` is `view[p & mask]`.  Positions must be stored in
//! monotonically increasing order; the index structures do not detect
//! violations.

pub mod mem;
pub mod mf;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use mf::chain::ChainMatcher;
pub use mf::dict::{StaticDictionary, INVALID_MATCH, MAX_DICTIONARY_MATCH_LEN};
pub use mf::dispatch::{MatchFinder, MatchFinderError, QUALITY_MAX, QUALITY_MIN};
pub use mf::quick::QuickMatcher;
pub use mf::tree::TreeMatcher;
pub use mf::types::{BackwardMatch, LongestMatch, MAX_ZOPFLI_LEN};
