use crate::{
    dsp::{envelope::EnvelopeStage, noise::NoiseBuffer, oscillator::Waveform},
    graph::modulator::ModulationSource,
    synth::note::Note,
};

/// Commands sent from the control thread to the audio thread.
///
/// Every value has already been validated by the sender. The engine applies
/// them at the next block boundary, stamped with that block's clock time.
#[derive(Debug)]
pub enum SynthMessage {
    NoteOn(Note),
    NoteOff(Note),
    AllNotesOff,
    PitchBend { semitones: f32 },
    MasterVolume(f32),
    Waveform { index: usize, waveform: Waveform },
    Detune { index: usize, cents: f32 },
    Octave { index: usize, octave: i32 },
    OscillatorVolume { index: usize, volume: f32 },
    OscillatorEnabled { index: usize, enabled: bool },
    Modulation {
        amount: f32,
        frequency_hz: f32,
        enabled: bool,
        source: ModulationSource,
    },
    /// `buffer` carries a freshly generated loop when the color changed.
    /// The engine swaps it in and sends the old one back for disposal.
    Noise {
        enabled: bool,
        volume: f32,
        buffer: Option<NoiseBuffer>,
    },
    Filter { cutoff_fraction: f32, q: f32 },
    Envelope {
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    },
    Echo { delay_seconds: f32, feedback: f32 },
}

/// What the engine is doing, published once per block for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSnapshot {
    /// Clock time at the end of the block.
    pub time: f64,
    /// Highest held note, if any key is down.
    pub sounding: Option<Note>,
    /// Base frequency of the reference voice in Hz.
    pub frequency: f32,
    pub stage: EnvelopeStage,
    pub level: f32,
    pub held: usize,
}

impl Default for SynthSnapshot {
    fn default() -> Self {
        Self {
            time: 0.0,
            sounding: None,
            frequency: 0.0,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            held: 0,
        }
    }
}
