#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase Accumulator Oscillator
============================

  phase      Position inside one cycle, 0.0 .. 1.0.
  increment  frequency / sample_rate, added every sample.

    sine      sin(2π·phase)
    square    +1 for the first half cycle, -1 for the second
    sawtooth  rising ramp 2·phase - 1
    triangle  1 - 4·|phase' - 0.5| with phase' shifted a quarter cycle, so
              it starts at 0 and peaks at 0.25 like the sine

Waveforms are naive (not band-limited). The lowpass after the envelope takes
the edge off the aliasing for the ranges this synth plays in.

Frequency may change on every sample (vibrato, noise modulation): only the
increment changes, the phase carries over, so there are no discontinuities
other than those the waveform itself has.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Waveform by selector position (0 = sine .. 3 = triangle).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    #[inline]
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (std::f32::consts::TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                let shifted = (phase + 0.25).fract();
                1.0 - 4.0 * (shifted - 0.5).abs()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Switch shape without touching the phase.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase);

        self.phase += frequency / sample_rate;
        // rem_euclid keeps negative (through-zero modulated) frequencies in range
        self.phase = self.phase.rem_euclid(1.0);

        out
    }

    /// Fill a block at a fixed frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
