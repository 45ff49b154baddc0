use crate::{
    dsp::envelope::{Envelope, EnvelopeStage},
    graph::node::{GraphNode, RenderCtx},
};

/// Gain gate of the voice path.
///
/// Renders the envelope's gain curve for a block; the engine multiplies it
/// into the oscillator + noise sum. Gate edges are stamped with clock time,
/// not sample counts, so a note-on that lands between blocks still starts
/// its attack at the right instant.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn new() -> Self {
        Self {
            env: Envelope::new(),
        }
    }

    pub fn with_params(attack: f32, decay: f32, sustain: f32, release: f32, max_duration: f32) -> Self {
        Self {
            env: Envelope::adsr(attack, decay, sustain, release, max_duration),
        }
    }

    pub fn attack_from(&mut self, start: f32, now: f64) {
        self.env.attack_from(start, now);
    }

    pub fn release(&mut self, now: f64) -> f32 {
        self.env.release(now)
    }

    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.env.set_adsr(attack, decay, sustain, release);
    }

    pub fn level_at(&self, time: f64) -> f32 {
        self.env.level_at(time)
    }

    pub fn stage_at(&self, time: f64) -> EnvelopeStage {
        self.env.stage_at(time)
    }

    pub fn is_active_at(&self, time: f64) -> bool {
        self.env.is_active_at(time)
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }
}

impl Default for EnvNode {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx.time, ctx.sample_rate);
    }

    fn reset(&mut self) {
        self.env.reset();
    }
}
