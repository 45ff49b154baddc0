#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{noise::NoiseColor, oscillator::Waveform},
    graph::{modulator::ModulationSource, oscillator::REFERENCE_OCTAVE},
    synth::params,
    SynthError, OSCILLATOR_COUNT,
};

/// Everything the engine needs at construction.
///
/// `Default` is the factory patch: three detuned sawtooths through a fairly
/// open, resonant lowpass with a short slap-back echo.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub master_volume: f32,
    pub oscillators: [OscillatorConfig; OSCILLATOR_COUNT],
    pub filter: FilterConfig,
    pub envelope: EnvelopeConfig,
    pub echo: EchoConfig,
    pub modulation: ModulationConfig,
    pub noise: NoiseConfig,
    /// Seed for the noise buffers, so a patch renders identically every run.
    pub noise_seed: u64,
    /// Capacity of the control → audio command ring.
    pub queue_capacity: usize,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorConfig {
    pub waveform: Waveform,
    pub octave: i32,
    pub detune_cents: f32,
    pub volume: f32,
    pub enabled: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Cutoff as a fraction of Nyquist.
    pub cutoff_fraction: f32,
    /// Linear resonance.
    pub q: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    /// Seconds that a time fraction of 1.0 stands for.
    pub max_duration: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoConfig {
    pub delay_seconds: f32,
    pub feedback: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationConfig {
    pub enabled: bool,
    pub source: ModulationSource,
    pub frequency_hz: f32,
    /// Depth in Hz.
    pub amount: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    pub enabled: bool,
    pub color: NoiseColor,
    pub volume: f32,
}

impl OscillatorConfig {
    fn sawtooth(detune_cents: f32) -> Self {
        Self {
            waveform: Waveform::Sawtooth,
            octave: REFERENCE_OCTAVE,
            detune_cents,
            volume: 0.33,
            enabled: true,
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            oscillators: [
                OscillatorConfig::sawtooth(0.0),
                OscillatorConfig::sawtooth(10.0),
                OscillatorConfig::sawtooth(-10.0),
            ],
            filter: FilterConfig {
                cutoff_fraction: 0.5,
                // 15 dB
                q: 5.62,
            },
            envelope: EnvelopeConfig {
                attack: 0.1,
                decay: 0.2,
                sustain: 0.3,
                release: 0.4,
                max_duration: 2.0,
            },
            echo: EchoConfig {
                delay_seconds: 0.1,
                feedback: 0.5,
            },
            modulation: ModulationConfig {
                enabled: false,
                source: ModulationSource::Lfo,
                frequency_hz: 5.0,
                amount: 10.0,
            },
            noise: NoiseConfig {
                enabled: false,
                color: NoiseColor::White,
                volume: 0.3,
            },
            noise_seed: 0x5EED,
            queue_capacity: 256,
        }
    }
}

impl SynthConfig {
    /// Run every value through the same checks as the runtime setters.
    pub fn validate(&self) -> Result<(), SynthError> {
        params::volume("master_volume", self.master_volume)?;

        for osc in &self.oscillators {
            params::octave(osc.octave)?;
            params::detune(osc.detune_cents)?;
            params::volume("oscillator_volume", osc.volume)?;
        }

        params::filter(self.filter.cutoff_fraction, self.filter.q)?;

        let env = &self.envelope;
        params::envelope(env.attack, env.decay, env.sustain, env.release)?;
        if !(env.max_duration.is_finite() && env.max_duration > 0.0) {
            return Err(SynthError::InvalidParameter {
                name: "max_duration",
                value: env.max_duration,
            });
        }

        params::echo(self.echo.delay_seconds, self.echo.feedback)?;
        params::modulation(self.modulation.amount, self.modulation.frequency_hz)?;
        params::volume("noise_volume", self.noise.volume)?;

        if self.queue_capacity == 0 {
            return Err(SynthError::InvalidParameter {
                name: "queue_capacity",
                value: 0.0,
            });
        }

        Ok(())
    }
}
