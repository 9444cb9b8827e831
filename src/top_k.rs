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
//! Bounded top-k selection over scored candidates.
//!
//! `TopK` keeps at most `k` entries and drops the current worst entry when a
//! better one arrives and capacity is full. Entries rank by score, then by
//! ascending candidate index, so equal scores resolve deterministically.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position of the candidate in the candidate set.
    pub index: usize,
    /// Dice score against the query, in `[0, 1]`.
    pub score: f64,
}

/// Heap key: greater means better (higher score, then lower index).
#[derive(Debug, Clone, Copy)]
struct Ranked(Match);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| other.0.index.cmp(&self.0.index))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Keeps the `k` best matches seen so far.
///
/// # Example
/// ```rust
/// use dice_match::top_k::TopK;
///
/// let mut best = TopK::new(2);
/// best.push(0, 0.4);
/// best.push(1, 0.9);
/// best.push(2, 0.7);
///
/// let ranked = best.into_sorted_vec();
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0].index, 1);
/// assert_eq!(ranked[1].index, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopK {
    /// Creates a selector that retains up to `k` matches.
    ///
    /// `k == 0` is allowed and retains nothing.
    pub fn new(k: usize) -> Self {
        Self {
            capacity: k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1 << 16)),
        }
    }

    /// Returns the maximum number of retained matches.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of matches currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` when another push must evict to make room.
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Returns the lowest-ranked retained match, the next one to be evicted.
    pub fn worst(&self) -> Option<Match> {
        self.heap.peek().map(|Reverse(Ranked(entry))| *entry)
    }

    /// Offers a match; keeps it only if it ranks among the best `k`.
    pub fn push(&mut self, index: usize, score: f64) {
        if self.capacity == 0 {
            return;
        }

        let entry = Reverse(Ranked(Match { index, score }));
        if self.heap.len() < self.capacity {
            self.heap.push(entry);
            return;
        }

        if let Some(mut worst) = self.heap.peek_mut() {
            // `Reverse` flips the order: smaller means better ranked.
            if entry < *worst {
                *worst = entry;
            }
        }
    }

    /// Offers every match held by `other`, still bounded by this capacity.
    pub fn merge(&mut self, other: TopK) {
        for Reverse(Ranked(entry)) in other.heap {
            self.push(entry.index, entry.score);
        }
    }

    /// Drops all retained matches.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Consumes the selector and returns matches best first.
    ///
    /// Scores are non-increasing; equal scores are ordered by ascending index.
    pub fn into_sorted_vec(self) -> Vec<Match> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(Ranked(entry))| entry)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Match, TopK};

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut top = TopK::new(0);
        top.push(0, 1.0);
        assert!(top.is_empty());
        assert!(top.is_full());
        assert!(top.into_sorted_vec().is_empty());
    }

    #[test]
    fn keeps_the_highest_scores() {
        let mut top = TopK::new(3);
        for (index, score) in [0.1, 0.9, 0.3, 0.8, 0.5, 0.2].into_iter().enumerate() {
            top.push(index, score);
        }
        assert_eq!(top.len(), 3);
        assert_eq!(top.worst().map(|entry| entry.index), Some(4));

        let indices: Vec<_> = top.into_sorted_vec().iter().map(|entry| entry.index).collect();
        assert_eq!(indices, vec![1, 3, 4]);
    }

    #[test]
    fn lower_scores_do_not_displace_a_full_selector() {
        let mut top = TopK::new(2);
        top.push(0, 0.7);
        top.push(1, 0.6);
        top.push(2, 0.1);
        assert_eq!(
            top.into_sorted_vec(),
            vec![Match { index: 0, score: 0.7 }, Match { index: 1, score: 0.6 }]
        );
    }

    #[test]
    fn ties_prefer_lower_indices() {
        let mut top = TopK::new(2);
        top.push(5, 0.5);
        top.push(3, 0.5);
        top.push(9, 0.5);
        top.push(1, 0.5);

        let indices: Vec<_> = top.into_sorted_vec().iter().map(|entry| entry.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn merge_is_bounded_by_receiver_capacity() {
        let mut left = TopK::new(2);
        left.push(0, 0.4);
        left.push(1, 0.6);

        let mut right = TopK::new(3);
        right.push(2, 0.9);
        right.push(3, 0.5);
        right.push(4, 0.1);

        left.merge(right);
        assert_eq!(left.capacity(), 2);
        let indices: Vec<_> = left.into_sorted_vec().iter().map(|entry| entry.index).collect();
        assert_eq!(indices, vec![2, 1]);
    }

    #[test]
    fn clear_resets_selector() {
        let mut top = TopK::new(4);
        top.push(0, 0.5);
        top.clear();
        assert!(top.is_empty());
        assert_eq!(top.worst(), None);
    }
}
