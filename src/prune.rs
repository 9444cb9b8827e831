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
//! Popcount-difference pruning.
//!
//! For a query with popcount `qc` and a candidate with popcount `cc`, the
//! intersection holds at most `min(qc, cc)` bits, so the Dice score is at
//! most `2 min(qc, cc) / (qc + cc)`. That bound shrinks as `|qc - cc|` grows,
//! and it drops below a threshold `t` once
//! `|qc - cc| > 2 qc (1/t - 1)`. Candidates past that distance are skipped
//! before their intersection is counted.

use tracing::trace;

/// Relative widening applied to the float bound before flooring it.
///
/// Only ever admits more candidates, so rounding in `1/t` cannot drop a
/// candidate that sits exactly on the bound.
const BOUND_SLACK: f64 = 1e-9;

/// Returns the largest popcount difference a candidate may have and still
/// reach `threshold` against a query with `query_popcount` set bits.
///
/// A threshold `<= 0` (or NaN) cannot prune anything and returns `key_bits`.
/// A threshold above `1` returns `0`.
///
/// # Example
/// ```rust
/// use dice_match::prune::max_popcount_delta;
///
/// // 2 * 100 * (1 / 0.5 - 1) = 200
/// assert_eq!(max_popcount_delta(100, 0.5, 1024), 200);
/// assert_eq!(max_popcount_delta(100, 0.0, 1024), 1024);
/// ```
pub fn max_popcount_delta(query_popcount: u32, threshold: f64, key_bits: u32) -> u32 {
    if threshold.is_nan() || threshold <= 0.0 {
        return key_bits;
    }
    let bound = 2.0 * f64::from(query_popcount) * (1.0 - threshold) / threshold;
    // `as` saturates: negative bounds become 0.
    (bound * (1.0 + BOUND_SLACK)).floor() as u32
}

/// Precomputed pruning test for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneBound {
    query_popcount: u32,
    max_delta: u32,
}

impl PruneBound {
    /// Builds the bound for a query popcount, threshold and key width in bits.
    pub fn new(query_popcount: u32, threshold: f64, key_bits: u32) -> Self {
        let max_delta = max_popcount_delta(query_popcount, threshold, key_bits);
        trace!(query_popcount, threshold, max_delta, "computed prune bound");
        Self {
            query_popcount,
            max_delta,
        }
    }

    /// Returns the popcount of the query this bound was built for.
    pub fn query_popcount(&self) -> u32 {
        self.query_popcount
    }

    /// Returns the largest admitted popcount difference.
    pub fn max_delta(&self) -> u32 {
        self.max_delta
    }

    /// Returns `true` if a candidate with this popcount may still qualify.
    ///
    /// `false` means the candidate provably scores below the threshold.
    #[inline]
    pub fn admits(&self, candidate_popcount: u32) -> bool {
        self.query_popcount.abs_diff(candidate_popcount) <= self.max_delta
    }
}


#[cfg(test)]
mod proptests {
    use super::PruneBound;
    use crate::dice::dice_score;
    use crate::popcount::{popcount, popcount_and};
    use proptest::prelude::*;

    /// Random key whose density is thinned by AND-ing `extra` masks.
    fn arb_key() -> impl Strategy<Value = Vec<u64>> {
        (
            proptest::collection::vec(any::<u64>(), 16),
            proptest::collection::vec(any::<u64>(), 16),
            0_u8..3,
        )
            .prop_map(|(base, mask, thinning)| {
                base.iter()
                    .zip(&mask)
                    .map(|(b, m)| match thinning {
                        0 => *b,
                        1 => b & m,
                        _ => b & m & m.rotate_left(17),
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn pruning_never_discards_a_qualifying_match(
            query in arb_key(),
            candidate in arb_key(),
            threshold in 0.01_f64..1.0
        ) {
            let qc = popcount(&query);
            let cc = popcount(&candidate);
            let score = dice_score(qc, cc, popcount_and(&query, &candidate));
            if score >= threshold {
                prop_assert!(PruneBound::new(qc, threshold, 1024).admits(cc));
            }
        }
    }
}
