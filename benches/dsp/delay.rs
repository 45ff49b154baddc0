//! Benchmarks for the feedback echo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::graph::{
    echo::EchoNode,
    node::{GraphNode, RenderCtx},
};

use crate::BLOCK_SIZES;

pub fn bench_echo(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/echo");
    let ctx = RenderCtx::new(48_000.0, 0.0);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let mut buffer = input.clone();

        // Default patch: 100 ms, feedback 0.5
        let mut echo = EchoNode::new(ctx.sample_rate, 0.1, 0.5);
        group.bench_with_input(BenchmarkId::new("slapback", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                echo.render_block(black_box(&mut buffer), &ctx);
            })
        });

        // Longest delay, long tail
        let mut echo = EchoNode::new(ctx.sample_rate, 1.0, 0.9);
        group.bench_with_input(BenchmarkId::new("long_tail", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                echo.render_block(black_box(&mut buffer), &ctx);
            })
        });
    }

    group.finish();
}
