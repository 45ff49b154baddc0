//! Benchmarks for noise generation and playback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fastrand::Rng;
use monosynth::dsp::noise::{NoiseBuffer, NoiseColor};
use monosynth::graph::noise::NoiseNode;

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    let sample_rate = 48_000.0;

    // Regeneration happens on the control thread; this is the cost of a color switch.
    for color in [NoiseColor::White, NoiseColor::Pink] {
        let mut rng = Rng::with_seed(1);
        group.bench_function(BenchmarkId::new("generate", color.name()), |b| {
            b.iter(|| NoiseBuffer::generate(black_box(color), sample_rate, &mut rng))
        });
    }

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let loop_buffer = NoiseBuffer::generate(NoiseColor::Pink, sample_rate, &mut Rng::with_seed(2));
        let mut node = NoiseNode::new(loop_buffer, true, 0.5);
        group.bench_with_input(BenchmarkId::new("playback", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.0);
                node.mix_into(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
