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
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dice_match::{DiceMatcher, popcount};

const KEY_WORDS: usize = 16;

fn random_keys(count: usize, seed: u64) -> Vec<u64> {
    // Simple LCG for reproducible keys; AND of two draws gives ~25% density.
    let mut x = seed;
    let mut next = move || {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        x
    };
    (0..count * KEY_WORDS).map(|_| next() & next()).collect()
}

fn bench_popcount(c: &mut Criterion) {
    let mut g = c.benchmark_group("popcount");
    let keys = random_keys(1, 1);

    g.bench_function("builtin_1024", |bench| {
        bench.iter(|| black_box(popcount::popcount(black_box(&keys))));
    });
    g.bench_function("portable_1024", |bench| {
        bench.iter(|| black_box(popcount::popcount_portable(black_box(&keys))));
    });

    g.finish();
}

fn bench_top_k(c: &mut Criterion) {
    let mut g = c.benchmark_group("top_k");
    let matcher = DiceMatcher::default();

    for &n in &[1_000, 10_000, 100_000] {
        let candidates = random_keys(n, 2);
        let counts = matcher.popcounts(&candidates).unwrap();
        let query = random_keys(1, 3);

        for &threshold in &[0.0, 0.5, 0.8] {
            let id = format!("n{n}_t{threshold}");
            g.bench_with_input(BenchmarkId::new("cached", &id), &n, |bench, _| {
                bench.iter(|| {
                    black_box(
                        matcher
                            .top_k(&query, &candidates, Some(counts.as_slice()), 10, threshold)
                            .unwrap(),
                    )
                });
            });
        }

        g.bench_with_input(BenchmarkId::new("uncached", n), &n, |bench, _| {
            bench.iter(|| black_box(matcher.top_k(&query, &candidates, None, 10, 0.5).unwrap()));
        });

        #[cfg(feature = "parallel")]
        g.bench_with_input(BenchmarkId::new("parallel", n), &n, |bench, _| {
            bench.iter(|| {
                black_box(
                    matcher
                        .par_top_k(&query, &candidates, Some(counts.as_slice()), 10, 0.5)
                        .unwrap(),
                )
            });
        });
    }

    g.finish();
}

criterion_group!(benches, bench_popcount, bench_top_k);
criterion_main!(benches);
