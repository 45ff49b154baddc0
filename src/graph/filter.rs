use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
Lowpass Stage
=============

The last tone-shaping stage before the master gain. Sits after the dry/echo
sum, so repeats are darkened by the same filter as the dry signal:

    (dry + echo) ──→ [ lowpass ] ──→ master

Cutoff is stored as a fraction of Nyquist rather than in Hz:

    fraction   cutoff @ 48 kHz
    1.0        ~24 kHz   (fully open)
    0.5        12 kHz    (default)
    0.1        2.4 kHz   (muffled)
    0.01       240 Hz    (very dark)

The Hz value is recomputed from the block's sample rate every block, so the
same patch sounds alike on any device.

Resonance is a linear Q (not dB). The default 5.62 corresponds to a 15 dB
peak at the cutoff.
*/

pub struct FilterNode {
    filter: SVFilter,
    cutoff_fraction: f32,
}

impl FilterNode {
    pub fn lowpass(cutoff_fraction: f32, q: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(0.0, q),
            cutoff_fraction,
        }
    }

    pub fn cutoff_fraction(&self) -> f32 {
        self.cutoff_fraction
    }

    pub fn q(&self) -> f32 {
        self.filter.q
    }

    pub fn set(&mut self, cutoff_fraction: f32, q: f32) {
        self.cutoff_fraction = cutoff_fraction;
        self.filter.set_q(q);
    }

    /// Cutoff in Hz at `sample_rate`.
    pub fn cutoff_hz(&self, sample_rate: f32) -> f32 {
        self.cutoff_fraction * sample_rate * 0.5
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.set_cutoff(self.cutoff_hz(ctx.sample_rate));
        self.filter.render(out, ctx.sample_rate);
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}
