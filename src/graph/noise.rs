use crate::{
    dsp::noise::{NoiseBuffer, NoiseColor},
    graph::node::{GraphNode, RenderCtx},
};

/// Audible noise voice: a looping noise buffer with its own level and route.
///
/// The buffer is the stateless part and is swapped out wholesale when the
/// color changes; `enabled` and `volume` belong to the node and survive the
/// swap.
pub struct NoiseNode {
    buffer: NoiseBuffer,
    enabled: bool,
    volume: f32,
}

impl NoiseNode {
    pub fn new(buffer: NoiseBuffer, enabled: bool, volume: f32) -> Self {
        Self {
            buffer,
            enabled,
            volume,
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.buffer.color()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    /// Install a buffer built elsewhere and hand back the one it replaces.
    pub fn swap_buffer(&mut self, buffer: NoiseBuffer) -> NoiseBuffer {
        std::mem::replace(&mut self.buffer, buffer)
    }

    /// Advance one block and add the noise into `out` if routed.
    pub fn mix_into(&mut self, out: &mut [f32]) {
        for o in out.iter_mut() {
            let sample = self.buffer.next_sample();
            if self.enabled {
                *o += sample * self.volume;
            }
        }
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        out.fill(0.0);
        self.mix_into(out);
    }
}
