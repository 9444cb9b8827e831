// MIT License
//
// Copyright (c) 2026 Raja Lehtihet & Wael El Oraiby
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//
//! Top-k Dice similarity matching over fixed-width bit fingerprints.
//!
//! Fingerprints are packed `u64` words of a fixed key width (1024 bits by
//! default). The engine scores one query against many candidates, skipping
//! candidates whose popcount alone rules out a qualifying score, and keeps
//! the `k` best matches.
//!
//! The crate currently exposes:
//! - [`popcount`] for population counts over word arrays.
//! - [`dice`] for Dice and Tanimoto scores from precomputed counts.
//! - [`prune`] for the popcount-difference bound used to skip candidates.
//! - [`top_k::TopK`] for bounded best-k selection.
//! - [`fingerprint::KeyLayout`] and [`fingerprint::CandidateSet`] for key
//!   width configuration and candidate views.
//! - [`matcher::DiceMatcher`], [`match_top_k`] and [`match_best`] for the
//!   one-against-many matching entry points.
//!
//! # Example
//! ```rust
//! use dice_match::match_top_k;
//!
//! // Two 256-bit keys (32 bytes, 4 words each).
//! let query = [u64::MAX, 0, 0, 0];
//! let candidates = [u64::MAX, 0, 0, 0, 0, u64::MAX, 0, 0];
//!
//! let matches = match_top_k(&query, &candidates, None, 32, 5, 0.5).unwrap();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].index, 0);
//! assert_eq!(matches[0].score, 1.0);
//! ```

pub mod dice;
pub mod fingerprint;
pub mod matcher;
pub mod popcount;
pub mod prune;
pub mod top_k;

pub use fingerprint::{CandidateSet, KeyLayout};
pub use matcher::{DiceMatcher, match_best, match_top_k};
pub use top_k::{Match, TopK};

/// Errors returned when matching inputs do not fit the configured key layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Returned when a key width in bytes is not a positive multiple of 32.
    #[error("invalid key width: {key_bytes} bytes is not a positive multiple of 32")]
    InvalidKeyWidth { key_bytes: usize },
    /// Returned when a buffer length disagrees with the key layout.
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// SplitMix64 mixer used to generate reproducible test fingerprints.
#[cfg(test)]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Builds `count` pseudo-random fingerprints of `key_words` words each.
///
/// `density_shift` thins the bits: each word is AND-ed with that many extra
/// random words, so `0` gives ~50% density, `1` ~25%, `2` ~12.5%.
#[cfg(test)]
pub(crate) fn random_fingerprints(
    seed: u64,
    count: usize,
    key_words: usize,
    density_shift: u32,
) -> Vec<u64> {
    let mut state = seed;
    let mut next = move || {
        state = splitmix64(state);
        state
    };
    (0..count * key_words)
        .map(|_| {
            let mut word = next();
            for _ in 0..density_shift {
                word &= next();
            }
            word
        })
        .collect()
}
