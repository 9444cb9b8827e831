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
//! One-against-many Dice matching.
//!
//! A match call validates its inputs once, computes the query popcount and
//! its [`PruneBound`], then walks the candidates: pruned candidates are never
//! intersected, the rest are scored and offered to a bounded [`TopK`].
//!
//! Candidates and their popcounts are only read, so one candidate set and
//! popcount cache can serve many queries, including from several threads.

use std::borrow::Cow;

use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::MatchError;
use crate::dice::dice_score;
use crate::fingerprint::{CandidateSet, KeyLayout};
use crate::popcount::{popcount, popcount_and};
use crate::prune::PruneBound;
use crate::top_k::{Match, TopK};

/// Candidates per rayon task in [`DiceMatcher::par_top_k`].
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK_CANDIDATES: usize = 2048;

/// Scores one candidate against a query.
///
/// Returns `None` when the candidate is pruned by `bound` or scores below
/// `threshold`. Pure, so the candidate range can be split across threads.
#[inline]
pub fn score_candidate(
    query: &[u64],
    candidate: &[u64],
    candidate_popcount: u32,
    bound: &PruneBound,
    threshold: f64,
) -> Option<f64> {
    if !bound.admits(candidate_popcount) {
        return None;
    }
    score_admitted(query, candidate, candidate_popcount, bound, threshold)
}

#[inline]
fn score_admitted(
    query: &[u64],
    candidate: &[u64],
    candidate_popcount: u32,
    bound: &PruneBound,
    threshold: f64,
) -> Option<f64> {
    let both = popcount_and(query, candidate);
    let score = dice_score(bound.query_popcount(), candidate_popcount, both);
    (score >= threshold).then_some(score)
}

/// Per-call counters reported in the debug log.
#[derive(Debug, Clone, Copy, Default)]
struct ScanStats {
    scanned: usize,
    pruned: usize,
    qualified: usize,
}

impl ScanStats {
    fn absorb(&mut self, other: ScanStats) {
        self.scanned += other.scanned;
        self.pruned += other.pruned;
        self.qualified += other.qualified;
    }
}

/// Scores a run of candidates whose first index is `first_index`.
fn scan<'a>(
    query: &[u64],
    candidates: impl Iterator<Item = &'a [u64]>,
    popcounts: &[u32],
    first_index: usize,
    bound: &PruneBound,
    threshold: f64,
    top: &mut TopK,
) -> ScanStats {
    let mut stats = ScanStats::default();
    for (offset, (candidate, &count)) in candidates.zip(popcounts).enumerate() {
        stats.scanned += 1;
        if !bound.admits(count) {
            stats.pruned += 1;
            continue;
        }
        if let Some(score) = score_admitted(query, candidate, count, bound, threshold) {
            stats.qualified += 1;
            top.push(first_index + offset, score);
        }
    }
    stats
}

/// Validated inputs for one match call.
struct Prepared<'a> {
    candidates: CandidateSet<'a>,
    popcounts: Cow<'a, [u32]>,
    bound: PruneBound,
}

/// Dice matcher configured for one key width.
///
/// # Example
/// ```rust
/// use dice_match::DiceMatcher;
///
/// let matcher = DiceMatcher::new(32).unwrap();
/// let query = [0xFFFF, 0, 0, 0];
/// let candidates = [0xFFFF, 0, 0, 0, 0x00FF, 0, 0, 0, 0, 0, 0, 1];
///
/// // Compute the popcount cache once and reuse it across queries.
/// let counts = matcher.popcounts(&candidates).unwrap();
/// let best = matcher.top_k(&query, &candidates, Some(counts.as_slice()), 2, 0.5).unwrap();
///
/// assert_eq!(best.len(), 2);
/// assert_eq!(best[0].index, 0);
/// assert_eq!(best[1].index, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiceMatcher {
    layout: KeyLayout,
}

impl DiceMatcher {
    /// Creates a matcher for keys of `key_bytes` bytes.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidKeyWidth`] unless `key_bytes` is a
    /// positive multiple of 32.
    pub fn new(key_bytes: usize) -> Result<Self, MatchError> {
        Ok(Self::with_layout(KeyLayout::new(key_bytes)?))
    }

    /// Creates a matcher for an already validated layout.
    pub fn with_layout(layout: KeyLayout) -> Self {
        Self { layout }
    }

    /// Returns the configured key layout.
    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Returns the popcount cache for `candidates`.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] when `candidates` does not split
    /// into whole keys.
    pub fn popcounts(&self, candidates: &[u64]) -> Result<Vec<u32>, MatchError> {
        self.layout.popcounts(candidates)
    }

    /// Returns up to `k` candidates scoring at least `threshold`, best first.
    ///
    /// `popcounts`, when given, must hold the popcount of every candidate in
    /// order; it is trusted, and stale counts yield wrong scores. When `None`
    /// the counts are computed for this call only.
    ///
    /// Equal scores are ordered by ascending candidate index.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] when the query is not one key
    /// wide, `candidates` does not split into whole keys, or `popcounts` has
    /// the wrong length. Nothing is scored in that case.
    pub fn top_k(
        &self,
        query: &[u64],
        candidates: &[u64],
        popcounts: Option<&[u32]>,
        k: usize,
        threshold: f64,
    ) -> Result<Vec<Match>, MatchError> {
        let prepared = self.prepare(query, candidates, popcounts, threshold)?;

        let mut top = TopK::new(k);
        let stats = scan(
            query,
            prepared.candidates.iter(),
            &prepared.popcounts,
            0,
            &prepared.bound,
            threshold,
            &mut top,
        );
        log_stats(&prepared.bound, stats, k, threshold, top.len());
        Ok(top.into_sorted_vec())
    }

    /// Same contract as [`DiceMatcher::top_k`], with the candidate range split
    /// across the rayon pool.
    ///
    /// Each task keeps its own [`TopK`]; they are merged at the end, so the
    /// result is identical to the sequential one.
    ///
    /// # Errors
    /// Same as [`DiceMatcher::top_k`].
    #[cfg(feature = "parallel")]
    pub fn par_top_k(
        &self,
        query: &[u64],
        candidates: &[u64],
        popcounts: Option<&[u32]>,
        k: usize,
        threshold: f64,
    ) -> Result<Vec<Match>, MatchError> {
        let prepared = self.prepare(query, candidates, popcounts, threshold)?;
        let key_words = self.layout.key_words();
        let bound = prepared.bound;

        let (top, stats) = prepared
            .candidates
            .words()
            .par_chunks(PARALLEL_CHUNK_CANDIDATES * key_words)
            .zip(prepared.popcounts.par_chunks(PARALLEL_CHUNK_CANDIDATES))
            .enumerate()
            .map(|(chunk, (words, counts))| {
                let mut local = TopK::new(k);
                let stats = scan(
                    query,
                    words.chunks_exact(key_words),
                    counts,
                    chunk * PARALLEL_CHUNK_CANDIDATES,
                    &bound,
                    threshold,
                    &mut local,
                );
                (local, stats)
            })
            .reduce(
                || (TopK::new(k), ScanStats::default()),
                |(mut top, mut stats), (other_top, other_stats)| {
                    top.merge(other_top);
                    stats.absorb(other_stats);
                    (top, stats)
                },
            );

        log_stats(&bound, stats, k, threshold, top.len());
        Ok(top.into_sorted_vec())
    }

    /// Returns the best Dice score of `query` against `candidates`.
    ///
    /// Runs with threshold `0` and `k = 1`, computing popcounts internally.
    /// Returns `None` when there are no candidates.
    ///
    /// # Errors
    /// Same as [`DiceMatcher::top_k`].
    pub fn best(&self, query: &[u64], candidates: &[u64]) -> Result<Option<f64>, MatchError> {
        let best = self.top_k(query, candidates, None, 1, 0.0)?;
        Ok(best.first().map(|entry| entry.score))
    }

    fn prepare<'a>(
        &self,
        query: &[u64],
        candidates: &'a [u64],
        popcounts: Option<&'a [u32]>,
        threshold: f64,
    ) -> Result<Prepared<'a>, MatchError> {
        self.layout.check_key(query)?;
        let candidates = self.layout.candidates(candidates)?;
        let popcounts = match popcounts {
            Some(counts) => {
                candidates.check_popcounts(counts)?;
                Cow::Borrowed(counts)
            }
            None => Cow::Owned(candidates.popcounts()),
        };
        let bound = PruneBound::new(popcount(query), threshold, self.layout.key_bits_u32());

        Ok(Prepared {
            candidates,
            popcounts,
            bound,
        })
    }
}

fn log_stats(bound: &PruneBound, stats: ScanStats, k: usize, threshold: f64, retained: usize) {
    debug!(
        candidates = stats.scanned,
        pruned = stats.pruned,
        qualified = stats.qualified,
        retained,
        k,
        threshold,
        query_popcount = bound.query_popcount(),
        max_delta = bound.max_delta(),
        "dice match finished"
    );
}

/// Returns up to `k` candidates scoring at least `threshold` against `query`.
///
/// `candidates` holds the keys back to back, each `key_bytes / 8` words
/// wide. See [`DiceMatcher::top_k`] for the result contract.
///
/// # Errors
/// Returns [`MatchError::InvalidKeyWidth`] unless `key_bytes` is a positive
/// multiple of 32, and [`MatchError::LengthMismatch`] for buffers that do not
/// fit the key width.
pub fn match_top_k(
    query: &[u64],
    candidates: &[u64],
    candidate_popcounts: Option<&[u32]>,
    key_bytes: usize,
    k: usize,
    threshold: f64,
) -> Result<Vec<Match>, MatchError> {
    DiceMatcher::new(key_bytes)?.top_k(query, candidates, candidate_popcounts, k, threshold)
}

/// Returns the best Dice score of `query` against `candidates`, or `None` if
/// there are none.
///
/// # Errors
/// Same as [`match_top_k`].
pub fn match_best(
    query: &[u64],
    candidates: &[u64],
    key_bytes: usize,
) -> Result<Option<f64>, MatchError> {
    DiceMatcher::new(key_bytes)?.best(query, candidates)
}
