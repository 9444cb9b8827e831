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
//! Population counts over packed `u64` word arrays.
//!
//! Keys are sized so their word count is a multiple of four, which lets the
//! hot loops keep four independent accumulators busy. `u64::count_ones`
//! lowers to the hardware `POPCNT` instruction where the target has one;
//! [`popcount_portable`] is the bit-trick equivalent used to cross-check it.

const M1: u64 = 0x5555_5555_5555_5555;
const M2: u64 = 0x3333_3333_3333_3333;
const M4: u64 = 0x0F0F_0F0F_0F0F_0F0F;
const H01: u64 = 0x0101_0101_0101_0101;

/// Returns the number of set bits across `words`.
///
/// Whole groups of four words go through the unrolled path; a ragged tail is
/// counted word by word.
///
/// # Example
/// ```rust
/// use dice_match::popcount::popcount;
///
/// let key = [u64::MAX, 0b1011, 0, 1 << 63];
/// assert_eq!(popcount(&key), 64 + 3 + 1);
/// ```
#[inline]
pub fn popcount(words: &[u64]) -> u32 {
    let mut acc = [0_u32; 4];
    let mut quads = words.chunks_exact(4);
    for quad in &mut quads {
        acc[0] += quad[0].count_ones();
        acc[1] += quad[1].count_ones();
        acc[2] += quad[2].count_ones();
        acc[3] += quad[3].count_ones();
    }
    let tail: u32 = quads.remainder().iter().map(|word| word.count_ones()).sum();
    acc[0] + acc[1] + acc[2] + acc[3] + tail
}

/// Returns the number of set bits in `left AND right` without building the
/// intersection.
///
/// Both slices are expected to have the same length; only the common prefix
/// is counted otherwise.
#[inline]
pub fn popcount_and(left: &[u64], right: &[u64]) -> u32 {
    debug_assert_eq!(left.len(), right.len());

    let mut acc = [0_u32; 4];
    let mut left_quads = left.chunks_exact(4);
    let mut right_quads = right.chunks_exact(4);
    for (a, b) in (&mut left_quads).zip(&mut right_quads) {
        acc[0] += (a[0] & b[0]).count_ones();
        acc[1] += (a[1] & b[1]).count_ones();
        acc[2] += (a[2] & b[2]).count_ones();
        acc[3] += (a[3] & b[3]).count_ones();
    }
    let tail: u32 = left_quads
        .remainder()
        .iter()
        .zip(right_quads.remainder())
        .map(|(a, b)| (a & b).count_ones())
        .sum();
    acc[0] + acc[1] + acc[2] + acc[3] + tail
}

/// Branch-free SWAR population count with the same contract as [`popcount`].
pub fn popcount_portable(words: &[u64]) -> u32 {
    words.iter().map(|&word| swar_count(word)).sum()
}

/// Returns one popcount per `key_words`-sized fingerprint in `candidates`.
///
/// Trailing words that do not fill a whole key are ignored, as is everything
/// when `key_words == 0`.
pub fn popcount_each(candidates: &[u64], key_words: usize) -> Vec<u32> {
    if key_words == 0 {
        return Vec::new();
    }
    candidates.chunks_exact(key_words).map(popcount).collect()
}

#[inline]
fn swar_count(mut x: u64) -> u32 {
    x -= (x >> 1) & M1;
    x = (x & M2) + ((x >> 2) & M2);
    x = (x + (x >> 4)) & M4;
    (x.wrapping_mul(H01) >> 56) as u32
}

#[cfg(test)]
mod tests {
    use super::{popcount, popcount_and, popcount_each, popcount_portable};
    use crate::random_fingerprints;

    #[test]
    fn counts_known_patterns() {
        assert_eq!(popcount(&[0; 16]), 0);
        assert_eq!(popcount(&[u64::MAX; 16]), 1024);
        assert_eq!(popcount(&[1, 2, 4, 8]), 4);
        assert_eq!(popcount(&[]), 0);
    }

    #[test]
    fn every_chunk_length_is_counted() {
        for words in [4_usize, 8, 12, 16, 20, 28, 32, 64] {
            let key = vec![0xF0F0_F0F0_F0F0_F0F0_u64; words];
            assert_eq!(popcount(&key), 32 * words as u32, "words = {words}");
        }
    }

    #[test]
    fn ragged_tail_is_still_counted() {
        assert_eq!(popcount(&[u64::MAX; 5]), 320);
        assert_eq!(popcount(&[1, 1, 1]), 3);
    }

    #[test]
    fn portable_count_matches_builtin() {
        let words = random_fingerprints(7, 64, 16, 0);
        for key in words.chunks_exact(16) {
            assert_eq!(popcount(key), popcount_portable(key));
        }
        assert_eq!(popcount_portable(&[u64::MAX]), 64);
        assert_eq!(popcount_portable(&[0x8000_0000_0000_0001]), 2);
    }

    #[test]
    fn fused_and_count_matches_materialised_intersection() {
        let words = random_fingerprints(11, 2, 16, 0);
        let (left, right) = words.split_at(16);
        let combined: Vec<u64> = left.iter().zip(right).map(|(a, b)| a & b).collect();
        assert_eq!(popcount_and(left, right), popcount(&combined));
        assert_eq!(popcount_and(left, left), popcount(left));
    }

    #[test]
    fn popcount_each_returns_one_count_per_key() {
        let mut candidates = vec![0_u64; 12];
        candidates[0] = 0b111;
        candidates[4] = u64::MAX;
        candidates[11] = 1;

        assert_eq!(popcount_each(&candidates, 4), vec![3, 64, 1]);
        assert!(popcount_each(&candidates, 0).is_empty());
        assert!(popcount_each(&[], 4).is_empty());
    }
}
