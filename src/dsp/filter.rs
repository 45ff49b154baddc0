use std::f32::consts::PI;

/*
Resonant Lowpass (TPT State-Variable Filter)
============================================

One two-pole lowpass stage: 12 dB/octave above the cutoff, with a resonant
peak at the cutoff controlled by Q.

  Q = 0.707   Butterworth, flat passband, no peak
  Q = 2       Audible bump at the cutoff
  Q = 5.6     (≈ 15 dB) Strong "squelch", the default of this synth
  Q → ∞       Self-oscillation (we keep Q finite and positive)

Topology-preserving transform form (Zavalishin / Simper):

  g  = tan(π · fc / fs)          prewarped integrator gain
  k  = 1 / Q                     damping
  h  = 1 / (1 + g·(g + k))

  v3 = x - ic2eq
  v1 = h·(ic1eq + g·v3)          bandpass
  v2 = ic2eq + g·v1              lowpass
  ic1eq = 2·v1 - ic1eq
  ic2eq = 2·v2 - ic2eq

The TPT form stays stable while cutoff and Q change between blocks, which
matters because the UI can sweep the cutoff while a note sounds.

Cutoff as a fraction of Nyquist
-------------------------------

The control surface expresses cutoff as `fraction · fs / 2`, so a patch
sounds the same at 44.1 kHz and 96 kHz. tan() blows up at exactly Nyquist,
so the effective cutoff is clamped a hair below it.
*/

/// Highest usable cutoff as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.499;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q,
        }
    }

    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * MAX_CUTOFF_RATIO);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    fn compute_k(&self) -> f32 {
        1.0 / self.q.max(0.01)
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, g: f32, k: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    /// Filter `buffer` in place.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = self.compute_k();

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, g, k);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }
}
