use crate::dsp::oscillator::{OscillatorBlock, Waveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Oscillator Voice
================

One of the synth's fixed oscillator voices. The voice controller tells it
which base frequency to play (note + octave + pitch bend already applied).
The modulator feeds its frequency input, and the voice's own detune scales
the sum:

    f(t) = (base + modulation(t)) · 2^(detune_cents / 1200)

Detune in cents (100 cents = 1 semitone). Small opposite detunes on two
voices give the classic "thick" chorus-like beating:

    voice 0:   0 cents
    voice 1: +10 cents
    voice 2: -10 cents

Routing, Not Muting
-------------------

Disabling a voice clears its `routed` flag. The phase keeps advancing every
sample whether or not the voice is routed, and only the contribution to the
mix is skipped. Re-enabling picks up mid-cycle exactly where a never-disabled
oscillator would be, so there is no restart click.

    routed:   ╱╱╱╱╱╱╱╱╱╱╱╱
    mixed:    ╱╱╱╱      ╱╱╱╱    (phase-continuous on re-entry)
*/

/// Octave number that plays at concert pitch.
pub const REFERENCE_OCTAVE: i32 = 4;

pub struct OscNode {
    osc: OscillatorBlock,
    /// Octave number, REFERENCE_OCTAVE = unison with the played note.
    octave: i32,
    /// Detune in cents (100 cents = 1 semitone).
    detune_cents: f32,
    gain: f32,
    routed: bool,
    /// Base frequency in Hz set by the voice controller.
    frequency: f32,
}

impl OscNode {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            octave: REFERENCE_OCTAVE,
            detune_cents: 0.0,
            gain: 1.0,
            routed: true,
            frequency: 440.0,
        }
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Sawtooth)
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn with_octave(mut self, octave: i32) -> Self {
        self.octave = octave;
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn set_octave(&mut self, octave: i32) {
        self.octave = octave;
    }

    pub fn detune(&self) -> f32 {
        self.detune_cents
    }

    pub fn set_detune(&mut self, cents: f32) {
        self.detune_cents = cents;
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn is_routed(&self) -> bool {
        self.routed
    }

    pub fn set_routed(&mut self, routed: bool) {
        self.routed = routed;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Retune to a new base frequency. Takes effect on the next sample.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    /// Frequency ratio of this voice's detune.
    #[inline]
    fn detune_ratio(&self) -> f32 {
        if self.detune_cents != 0.0 {
            2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            1.0
        }
    }

    /// Base frequency with this voice's detune applied.
    #[inline]
    pub fn detuned_frequency(&self) -> f32 {
        self.frequency * self.detune_ratio()
    }

    /// Advance one block and add this voice into `out` if it is routed.
    ///
    /// `modulation` holds per-sample frequency offsets in Hz and must be at
    /// least as long as `out`.
    pub fn mix_into(&mut self, out: &mut [f32], modulation: &[f32], ctx: &RenderCtx) {
        debug_assert!(modulation.len() >= out.len());
        let ratio = self.detune_ratio();

        for (o, m) in out.iter_mut().zip(modulation.iter()) {
            let sample = self.osc.next_sample((self.frequency + m) * ratio, ctx.sample_rate);
            if self.routed {
                *o += sample * self.gain;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> f32 {
        self.osc.phase()
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frequency = self.detuned_frequency();
        for sample in out.iter_mut() {
            let value = self.osc.next_sample(frequency, ctx.sample_rate);
            *sample = if self.routed { value * self.gain } else { 0.0 };
        }
    }

    fn reset(&mut self) {
        self.osc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::new(sample_rate, 0.0);
        let mut osc = OscNode::new(Waveform::Sine);
        osc.set_frequency(440.0);

        let mut buffer = vec![0.0f32; 128];
        osc.render_block(&mut buffer, &ctx);

        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        assert!((buffer[sample_index] - expected).abs() < 1e-4);
    }

    #[test]
    fn detune_scales_frequency_by_cents() {
        let mut osc = OscNode::sawtooth().with_detune(1200.0);
        osc.set_frequency(220.0);
        assert!((osc.detuned_frequency() - 440.0).abs() < 1e-3);

        osc.set_detune(-100.0);
        let expected = 220.0 * 2.0_f32.powf(-1.0 / 12.0);
        assert!((osc.detuned_frequency() - expected).abs() < 1e-3);
    }

    #[test]
    fn unrouted_voice_is_silent_but_keeps_running() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let modulation = vec![0.0f32; 100];

        let mut reference = OscNode::new(Waveform::Sine);
        let mut toggled = OscNode::new(Waveform::Sine);
        toggled.set_routed(false);

        let mut ref_out = vec![0.0f32; 100];
        let mut toggled_out = vec![0.0f32; 100];
        reference.mix_into(&mut ref_out, &modulation, &ctx);
        toggled.mix_into(&mut toggled_out, &modulation, &ctx);

        assert!(toggled_out.iter().all(|&s| s == 0.0), "unrouted voice leaked into mix");
        assert_eq!(reference.phase(), toggled.phase(), "phase must advance while unrouted");

        // Re-enable: output matches the voice that was never disabled
        toggled.set_routed(true);
        let mut a = vec![0.0f32; 16];
        let mut b = vec![0.0f32; 16];
        reference.mix_into(&mut a, &modulation, &ctx);
        toggled.mix_into(&mut b, &modulation, &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn modulation_shifts_frequency() {
        let ctx = RenderCtx::new(1_000.0, 0.0);
        let mut plain = OscNode::sawtooth();
        let mut modulated = OscNode::sawtooth();
        plain.set_frequency(10.0);
        modulated.set_frequency(10.0);

        let mut out = vec![0.0f32; 10];
        plain.mix_into(&mut out, &[0.0; 10], &ctx);
        modulated.mix_into(&mut out, &[10.0; 10], &ctx);

        // 10 Hz for 10 ms = 0.1 cycles, 20 Hz = 0.2 cycles
        assert!((plain.phase() - 0.1).abs() < 1e-4);
        assert!((modulated.phase() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn detune_applies_on_top_of_modulation() {
        let ctx = RenderCtx::new(1_000.0, 0.0);
        let mut osc = OscNode::sawtooth().with_detune(1200.0);
        osc.set_frequency(10.0);

        let mut out = vec![0.0f32; 10];
        osc.mix_into(&mut out, &[10.0; 10], &ctx);

        // (10 Hz + 10 Hz) an octave up = 40 Hz, 0.4 cycles in 10 ms
        assert!((osc.phase() - 0.4).abs() < 1e-4);
    }

    #[test]
    fn mix_into_adds_scaled_voice() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let mut osc = OscNode::new(Waveform::Square).with_gain(0.25);
        let mut out = vec![1.0f32; 8];
        osc.mix_into(&mut out, &[0.0; 8], &ctx);
        // Square starts high: 1.0 + 0.25
        assert!((out[0] - 1.25).abs() < 1e-6);
    }
}
