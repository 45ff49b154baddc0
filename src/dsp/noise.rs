use fastrand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Noise Buffers
=============

Noise is generated once into a finite buffer and then looped, exactly like a
sample. Generation is the expensive part (one random draw per sample, plus
the pink filter), so it never runs on the audio thread: buffers are built at
construction or on the control side and handed over whole.

White Noise
-----------

Independent uniform samples in [-1, 1]. Equal energy per Hz, so it sounds
bright and hissy.

Pink Noise
----------

Equal energy per OCTAVE: the spectrum falls off at about -3 dB/octave
(1/f power). Sounds darker and more "natural" than white.

We shape white noise with a bank of seven one-pole lowpass filters at
staggered corner frequencies (the Voss-McCartney style approximation
popularised by Paul Kellet). Each register leaks at its own rate; summing
them approximates the 1/f slope across the audio band.

  b0 = 0.99886·b0 + 0.0555179·w
  b1 = 0.99332·b1 + 0.0750759·w
  b2 = 0.96900·b2 + 0.1538520·w
  b3 = 0.86650·b3 + 0.3104856·w
  b4 = 0.55000·b4 + 0.5329522·w
  b5 = -0.7616·b5 - 0.0168980·w
  out = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + 0.5362·w) · 0.11
  b6 = 0.115926·w

The 0.11 output scale is an empirical gain compensation that keeps the sum
roughly inside [-1, 1]. It is not a hard bound: rare peaks go slightly over.

Looping
-------

A two second loop is long enough that the repetition is not audible as a
pitch (0.5 Hz) and short enough to generate quickly.
*/

/// Length of a generated noise loop in seconds.
pub const NOISE_BUFFER_SECONDS: f32 = 2.0;

/// Output gain compensation of the pink filter bank.
pub const PINK_GAIN: f32 = 0.11;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Pink,
}

impl NoiseColor {
    pub fn name(&self) -> &'static str {
        match self {
            NoiseColor::White => "white",
            NoiseColor::Pink => "pink",
        }
    }
}

#[inline]
fn white_sample(rng: &mut Rng) -> f32 {
    rng.f32() * 2.0 - 1.0
}

/// The seven-register pink filter bank.
#[derive(Debug, Clone, Default)]
pub struct PinkFilter {
    b: [f32; 7],
}

impl PinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_sample(&mut self, white: f32) -> f32 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;
        let out = (b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362) * PINK_GAIN;
        b[6] = white * 0.115926;
        out
    }
}

pub fn white_noise(len: usize, rng: &mut Rng) -> Vec<f32> {
    (0..len).map(|_| white_sample(rng)).collect()
}

pub fn pink_noise(len: usize, rng: &mut Rng) -> Vec<f32> {
    let mut filter = PinkFilter::new();
    (0..len).map(|_| filter.next_sample(white_sample(rng))).collect()
}

/// A generated noise loop plus its read position.
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    color: NoiseColor,
    samples: Box<[f32]>,
    position: usize,
}

impl NoiseBuffer {
    /// Generate `NOISE_BUFFER_SECONDS` of noise at `sample_rate`.
    pub fn generate(color: NoiseColor, sample_rate: f32, rng: &mut Rng) -> Self {
        let len = ((NOISE_BUFFER_SECONDS * sample_rate) as usize).max(1);
        Self::with_len(color, len, rng)
    }

    pub fn with_len(color: NoiseColor, len: usize, rng: &mut Rng) -> Self {
        let samples = match color {
            NoiseColor::White => white_noise(len, rng),
            NoiseColor::Pink => pink_noise(len, rng),
        };
        Self {
            color,
            samples: samples.into_boxed_slice(),
            position: 0,
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Next sample of the loop, wrapping at the end.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let Some(&sample) = self.samples.get(self.position) else {
            return 0.0;
        };
        self.position += 1;
        if self.position == self.samples.len() {
            self.position = 0;
        }
        sample
    }
}
