use crate::{graph::node::RenderCtx, synth::engine::MonoSynth, MAX_BLOCK_SIZE};

/// Where rendered audio goes, and the clock it runs on.
///
/// A renderer owns time: `current_time` is the clock time of the next sample
/// it will accept, so it advances as `output` is called.
pub trait Renderer {
    fn current_time(&self) -> f64;
    fn sample_rate(&self) -> f32;
    /// Accept the next run of mono samples.
    fn output(&mut self, samples: &[f32]);
}

/// Collects everything in memory. For tests, benches and bouncing to disk.
#[derive(Debug, Clone)]
pub struct OfflineRenderer {
    sample_rate: f32,
    samples: Vec<f32>,
}

impl OfflineRenderer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Renderer for OfflineRenderer {
    fn current_time(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn output(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }
}

/// Render `frames` samples from `synth` into `renderer`, one block at a time.
pub fn render_frames<R: Renderer + ?Sized>(synth: &mut MonoSynth, renderer: &mut R, frames: usize) {
    let mut block = [0.0f32; MAX_BLOCK_SIZE];
    let mut remaining = frames;

    while remaining > 0 {
        let len = remaining.min(MAX_BLOCK_SIZE);
        let ctx = RenderCtx::new(renderer.sample_rate(), renderer.current_time());

        synth.render_block(&mut block[..len], &ctx);
        renderer.output(&block[..len]);
        remaining -= len;
    }
}
