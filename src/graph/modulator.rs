use crate::{
    dsp::{noise::NoiseBuffer, oscillator::OscillatorBlock},
    graph::node::{GraphNode, RenderCtx},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Frequency Modulator
===================

A control signal that never reaches the speakers. Its output, in Hz, is added
to the frequency input of every oscillator voice:

    f_voice(t) = (f_base + depth · source(t)) · detune

Two sources, exactly one of which is live at any time:

  Lfo     A sine at sub-audio rate (default 5 Hz): vibrato. With a depth of
          a few Hz the pitch wobbles; at tens of Hz and large depth it turns
          into a siren.

  Noise   A looping white-noise buffer: random pitch jitter, "broken tape"
          and growl textures at larger depths.

Switching source flips the selector; the previously selected generator is no
longer evaluated at all, so the two can never be summed together.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulationSource {
    Lfo,
    Noise,
}

impl ModulationSource {
    pub fn name(&self) -> &'static str {
        match self {
            ModulationSource::Lfo => "lfo",
            ModulationSource::Noise => "noise",
        }
    }
}

pub struct ModulatorNode {
    source: ModulationSource,
    enabled: bool,
    lfo: OscillatorBlock,
    lfo_frequency: f32,
    noise: NoiseBuffer,
    /// Peak frequency deviation in Hz.
    depth: f32,
}

impl ModulatorNode {
    pub fn new(noise: NoiseBuffer, lfo_frequency: f32, depth: f32) -> Self {
        Self {
            source: ModulationSource::Lfo,
            enabled: false,
            lfo: OscillatorBlock::sine(),
            lfo_frequency,
            noise,
            depth,
        }
    }

    pub fn set(&mut self, depth: f32, lfo_frequency: f32, enabled: bool, source: ModulationSource) {
        self.depth = depth;
        self.lfo_frequency = lfo_frequency;
        self.enabled = enabled;
        self.source = source;
    }

    pub fn source(&self) -> ModulationSource {
        self.source
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn lfo_frequency(&self) -> f32 {
        self.lfo_frequency
    }
}

impl GraphNode for ModulatorNode {
    /// Write the frequency offset (Hz) for each sample of the block.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if !self.enabled {
            out.fill(0.0);
            return;
        }

        match self.source {
            ModulationSource::Lfo => {
                for sample in out.iter_mut() {
                    *sample = self.lfo.next_sample(self.lfo_frequency, ctx.sample_rate) * self.depth;
                }
            }
            ModulationSource::Noise => {
                for sample in out.iter_mut() {
                    *sample = self.noise.next_sample() * self.depth;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}
