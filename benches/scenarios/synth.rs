//! Benchmarks for the full signal path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::{
    dsp::NoiseColor,
    graph::{ModulationSource, RenderCtx},
    MonoSynth, Note, SynthConfig,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === DEFAULT PATCH ===
        // three detuned saws → envelope → echo → resonant lowpass
        let mut synth = MonoSynth::new(&SynthConfig::default(), SAMPLE_RATE).unwrap();
        synth.note_on(Note::A4).unwrap();
        let mut time = 0.0;
        group.bench_with_input(BenchmarkId::new("default_patch", size), &size, |b, _| {
            b.iter(|| {
                synth.render_block(black_box(&mut buffer), &RenderCtx::new(SAMPLE_RATE, time));
                time += size as f64 / SAMPLE_RATE as f64;
            })
        });

        // === EVERYTHING ON ===
        // pink noise voice, LFO vibrato, long echo
        let mut synth = MonoSynth::new(&SynthConfig::default(), SAMPLE_RATE).unwrap();
        synth.set_noise(true, NoiseColor::Pink, 0.3).unwrap();
        synth.set_modulation(10.0, 5.0, true, ModulationSource::Lfo).unwrap();
        synth.set_echo(0.5, 0.8).unwrap();
        synth.note_on(Note(-12)).unwrap();
        let mut time = 0.0;
        group.bench_with_input(BenchmarkId::new("full", size), &size, |b, _| {
            b.iter(|| {
                synth.render_block(black_box(&mut buffer), &RenderCtx::new(SAMPLE_RATE, time));
                time += size as f64 / SAMPLE_RATE as f64;
            })
        });

        // === QUEUE TRAFFIC ===
        // a note change through the handle every block
        let (mut synth, mut handle) = MonoSynth::with_handle(&SynthConfig::default(), SAMPLE_RATE).unwrap();
        let mut time = 0.0;
        let mut step = 0;
        group.bench_with_input(BenchmarkId::new("handle_legato", size), &size, |b, _| {
            b.iter(|| {
                let _ = handle.note_off(Note(step % 12));
                step += 1;
                let _ = handle.note_on(Note(step % 12));
                synth.render_block(black_box(&mut buffer), &RenderCtx::new(SAMPLE_RATE, time));
                time += size as f64 / SAMPLE_RATE as f64;
            })
        });
    }

    group.finish();
}
