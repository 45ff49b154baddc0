//! Benchmarks for the automation-driven ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (linear ramp)
        let mut env = Envelope::adsr(0.5, 0.2, 0.7, 0.3, 2.0);
        env.attack_from(0.0, 0.0);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(0.1), sample_rate);
            })
        });

        // Decay phase (exponential approach, one exp() per sample)
        let mut env = Envelope::adsr(0.01, 0.5, 0.3, 0.3, 2.0);
        env.attack_from(0.0, 0.0);
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(0.5), sample_rate);
            })
        });

        // Release phase (ramp from the held level)
        let mut env = Envelope::adsr(0.01, 0.1, 0.7, 0.9, 2.0);
        env.attack_from(0.0, 0.0);
        env.release(0.5);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(0.6), sample_rate);
            })
        });
    }

    group.finish();
}
