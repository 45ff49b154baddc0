//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::oscillator::{OscillatorBlock, Waveform};
use monosynth::graph::{node::RenderCtx, oscillator::OscNode};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            let mut osc = OscillatorBlock::new(waveform);
            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(440.0), sample_rate);
                })
            });
        }

        // Detuned voice with a per-sample frequency input
        let ctx = RenderCtx::new(sample_rate, 0.0);
        let modulation = vec![3.0f32; size];
        let mut voice = OscNode::sawtooth().with_detune(10.0);
        group.bench_with_input(BenchmarkId::new("voice_modulated", size), &size, |b, _| {
            b.iter(|| {
                buffer.fill(0.0);
                voice.mix_into(black_box(&mut buffer), black_box(&modulation), &ctx);
            })
        });
    }

    group.finish();
}
