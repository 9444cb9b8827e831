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
//! Key width configuration and borrowed candidate views.
//!
//! A fingerprint is a `&[u64]` of exactly [`KeyLayout::key_words`] words. A
//! candidate set is many fingerprints stored back to back in one slice.

use std::slice::ChunksExact;

use crate::MatchError;
use crate::popcount::popcount_each;

/// Bytes per packed word.
pub const WORD_BYTES: usize = 8;
/// Bits per packed word.
pub const WORD_BITS: usize = 64;
/// Key widths must be a whole number of four-word popcount groups.
const GROUP_BYTES: usize = 4 * WORD_BYTES;

/// Width of the fingerprints a matcher compares.
///
/// # Example
/// ```rust
/// use dice_match::fingerprint::KeyLayout;
///
/// let layout = KeyLayout::new(128).unwrap();
/// assert_eq!(layout.key_words(), 16);
/// assert_eq!(layout.key_bits(), 1024);
/// assert!(KeyLayout::new(17).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyLayout {
    key_words: usize,
}

impl KeyLayout {
    /// 1024-bit keys: 128 bytes, 16 words.
    pub const DEFAULT: KeyLayout = KeyLayout { key_words: 16 };

    /// Creates a layout from a key width in bytes.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidKeyWidth`] unless `key_bytes` is a
    /// positive multiple of 32.
    pub fn new(key_bytes: usize) -> Result<Self, MatchError> {
        if key_bytes == 0 || key_bytes % GROUP_BYTES != 0 {
            return Err(MatchError::InvalidKeyWidth { key_bytes });
        }
        Ok(Self {
            key_words: key_bytes / WORD_BYTES,
        })
    }

    /// Returns the key width in bytes.
    pub fn key_bytes(&self) -> usize {
        self.key_words * WORD_BYTES
    }

    /// Returns the key width in words.
    pub fn key_words(&self) -> usize {
        self.key_words
    }

    /// Returns the key width in bits.
    pub fn key_bits(&self) -> usize {
        self.key_words * WORD_BITS
    }

    /// Checks that `words` holds exactly one key.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] on any other length.
    pub fn check_key(&self, words: &[u64]) -> Result<(), MatchError> {
        if words.len() != self.key_words {
            return Err(MatchError::LengthMismatch {
                what: "query words",
                expected: self.key_words,
                actual: words.len(),
            });
        }
        Ok(())
    }

    /// Views `words` as a set of back-to-back keys.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] when `words` does not split into
    /// whole keys.
    pub fn candidates<'a>(&self, words: &'a [u64]) -> Result<CandidateSet<'a>, MatchError> {
        if words.len() % self.key_words != 0 {
            return Err(MatchError::LengthMismatch {
                what: "candidate words",
                expected: words.len() / self.key_words * self.key_words,
                actual: words.len(),
            });
        }
        Ok(CandidateSet {
            layout: *self,
            words,
        })
    }

    /// Returns one popcount per key in `candidates`.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] when `candidates` does not split
    /// into whole keys.
    pub fn popcounts(&self, candidates: &[u64]) -> Result<Vec<u32>, MatchError> {
        Ok(self.candidates(candidates)?.popcounts())
    }

    /// Packs a byte buffer holding one or more keys into words.
    ///
    /// Every 8 bytes become one little-endian word. Callers must use the same
    /// convention for queries and candidates.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] when the byte length is not a
    /// multiple of the key width.
    pub fn words_from_le_bytes(&self, bytes: &[u8]) -> Result<Vec<u64>, MatchError> {
        let key_bytes = self.key_bytes();
        if bytes.len() % key_bytes != 0 {
            return Err(MatchError::LengthMismatch {
                what: "key bytes",
                expected: bytes.len() / key_bytes * key_bytes,
                actual: bytes.len(),
            });
        }

        let mut words = Vec::with_capacity(bytes.len() / WORD_BYTES);
        for chunk in bytes.chunks_exact(WORD_BYTES) {
            let mut word = [0_u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            words.push(u64::from_le_bytes(word));
        }
        Ok(words)
    }

    /// Key width in bits as a popcount bound.
    pub(crate) fn key_bits_u32(&self) -> u32 {
        u32::try_from(self.key_bits()).unwrap_or(u32::MAX)
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Borrowed, read-only view over back-to-back candidate keys.
///
/// Candidate `i` occupies words `i * key_words .. (i + 1) * key_words`.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSet<'a> {
    layout: KeyLayout,
    words: &'a [u64],
}

impl<'a> CandidateSet<'a> {
    /// Returns the layout the candidates were checked against.
    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Returns the underlying words.
    pub fn words(&self) -> &'a [u64] {
        self.words
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.words.len() / self.layout.key_words
    }

    /// Returns `true` when there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns candidate `index`, if present.
    pub fn get(&self, index: usize) -> Option<&'a [u64]> {
        let start = index.checked_mul(self.layout.key_words)?;
        let end = start.checked_add(self.layout.key_words)?;
        self.words.get(start..end)
    }

    /// Iterates candidates in index order.
    pub fn iter(&self) -> ChunksExact<'a, u64> {
        self.words.chunks_exact(self.layout.key_words)
    }

    /// Returns one popcount per candidate.
    pub fn popcounts(&self) -> Vec<u32> {
        popcount_each(self.words, self.layout.key_words)
    }

    /// Checks that a popcount cache has one entry per candidate.
    ///
    /// # Errors
    /// Returns [`MatchError::LengthMismatch`] on a length disagreement. The
    /// counts themselves are trusted.
    pub fn check_popcounts(&self, popcounts: &[u32]) -> Result<(), MatchError> {
        if popcounts.len() != self.len() {
            return Err(MatchError::LengthMismatch {
                what: "candidate popcounts",
                expected: self.len(),
                actual: popcounts.len(),
            });
        }
        Ok(())
    }
}
