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
use dice_match::{KeyLayout, match_best, match_top_k};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 1024-bit keys, 16 words each.
    let layout = KeyLayout::DEFAULT;
    let words = layout.key_words();

    // Query: low half of the key set.
    let mut query = vec![0_u64; words];
    query[..words / 2].fill(u64::MAX);

    // Candidates: identical, disjoint, and a quarter-shifted half.
    let mut candidates = vec![0_u64; 3 * words];
    candidates[..words / 2].fill(u64::MAX);
    candidates[words + words / 2..2 * words].fill(u64::MAX);
    candidates[2 * words + words / 4..2 * words + 3 * words / 4].fill(u64::MAX);

    for threshold in [0.0, 0.6] {
        let matches = match_top_k(&query, &candidates, None, layout.key_bytes(), 3, threshold)?;
        println!("threshold {threshold:.1}: {} match(es)", matches.len());
        for entry in matches {
            println!("  candidate {:>2}  dice {:.3}", entry.index, entry.score);
        }
    }

    let best = match_best(&query, &candidates, layout.key_bytes())?;
    println!("best score: {best:?}");

    Ok(())
}
