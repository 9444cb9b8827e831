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
//! Similarity scores computed from population counts.
//!
//! Both scores treat two empty fingerprints as non-matching: an all-zero
//! pair scores `0.0`, not `1.0`.

use crate::popcount::{popcount, popcount_and};

/// Returns the Dice coefficient `2|A ∩ B| / (|A| + |B|)` from popcounts.
///
/// The returned value is in `[0, 1]` when `pc_and <= min(pc_a, pc_b)`.
/// Returns `0.0` when both fingerprints are empty.
///
/// # Example
/// ```rust
/// use dice_match::dice::dice_score;
///
/// assert_eq!(dice_score(512, 512, 512), 1.0);
/// assert_eq!(dice_score(512, 256, 256), 2.0 * 256.0 / 768.0);
/// assert_eq!(dice_score(0, 0, 0), 0.0);
/// ```
#[inline]
pub fn dice_score(pc_a: u32, pc_b: u32, pc_and: u32) -> f64 {
    let total = u64::from(pc_a) + u64::from(pc_b);
    if total == 0 {
        return 0.0;
    }
    2.0 * f64::from(pc_and) / total as f64
}

/// Returns the Dice coefficient of two fingerprints of equal width.
pub fn dice_coefficient(left: &[u64], right: &[u64]) -> f64 {
    dice_score(popcount(left), popcount(right), popcount_and(left, right))
}

/// Returns the Tanimoto (Jaccard) coefficient `|A ∩ B| / |A ∪ B|` from
/// popcounts.
///
/// Returns `0.0` when the union is empty.
#[inline]
pub fn tanimoto_score(pc_a: u32, pc_b: u32, pc_and: u32) -> f64 {
    let union = (u64::from(pc_a) + u64::from(pc_b)).saturating_sub(u64::from(pc_and));
    if union == 0 {
        return 0.0;
    }
    f64::from(pc_and) / union as f64
}

#[cfg(test)]
mod tests {
    use super::{dice_coefficient, dice_score, tanimoto_score};
    use crate::popcount::{popcount, popcount_and};
    use crate::random_fingerprints;

    /// Packs a `'0'`/`'1'` string into one word, first character as bit 0.
    fn bits(pattern: &str) -> [u64; 4] {
        let mut word = 0_u64;
        for (offset, bit) in pattern.chars().enumerate() {
            if bit == '1' {
                word |= 1 << offset;
            }
        }
        [word, 0, 0, 0]
    }

    #[test]
    fn identical_fingerprints_score_one() {
        let key = bits("1111011");
        assert_eq!(dice_coefficient(&key, &key), 1.0);
    }

    #[test]
    fn disjoint_fingerprints_score_zero() {
        assert_eq!(dice_coefficient(&bits("0000100"), &bits("1111011")), 0.0);
    }

    #[test]
    fn partial_overlap_scores_half() {
        assert_eq!(dice_coefficient(&bits("1000001"), &bits("1111011")), 0.5);
    }

    #[test]
    fn empty_pair_scores_zero() {
        assert_eq!(dice_coefficient(&[0; 16], &[0; 16]), 0.0);
        assert_eq!(dice_score(0, 0, 0), 0.0);
    }

    #[test]
    fn complement_scores_zero() {
        let key = random_fingerprints(3, 1, 16, 0);
        let inverted: Vec<u64> = key.iter().map(|word| !word).collect();
        assert_eq!(dice_coefficient(&key, &inverted), 0.0);
    }

    #[test]
    fn random_pairs_stay_in_unit_interval() {
        let words = random_fingerprints(5, 32, 16, 0);
        let keys: Vec<&[u64]> = words.chunks_exact(16).collect();
        for pair in keys.windows(2) {
            let score = dice_coefficient(pair[0], pair[1]);
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn counts_near_u32_max_do_not_overflow() {
        assert_eq!(dice_score(u32::MAX, u32::MAX, u32::MAX), 1.0);
    }

    #[test]
    fn tanimoto_scores_known_patterns() {
        let left = bits("1000011");
        let right = bits("1111011");
        let score = tanimoto_score(popcount(&left), popcount(&right), popcount_and(&left, &right));
        assert_eq!(score, 0.5);
        assert_eq!(tanimoto_score(6, 6, 6), 1.0);
        assert_eq!(tanimoto_score(0, 0, 0), 0.0);
    }
}
