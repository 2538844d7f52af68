//! LZ77 match finding: index structures, scoring, and the static-dictionary
//! fallback behind one quality-selected front end.

pub mod chain;
pub mod dict;
pub mod dispatch;
pub mod quick;
pub mod score;
pub mod tree;
pub mod types;

// Re-export the front-end API at the module level.
pub use dispatch::{
    MatchFinder, MatchFinderError, LGWIN_MAX, LGWIN_MIN, QUALITY_MAX, QUALITY_MIN,
};
pub use types::{BackwardMatch, LongestMatch, MAX_ZOPFLI_LEN};
