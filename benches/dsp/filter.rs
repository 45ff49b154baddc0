//! Benchmarks for the resonant lowpass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass(1_000.0, 0.707);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), sample_rate);
            })
        });

        // Default patch resonance
        let mut filter = SVFilter::lowpass(12_000.0, 5.62);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_resonant", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), sample_rate);
            })
        });
    }

    group.finish();
}
