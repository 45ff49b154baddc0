use fastrand::Rng;
use log::{debug, warn};
use rtrb::{Consumer, Producer};

use crate::{
    dsp::{
        noise::{NoiseBuffer, NoiseColor},
        oscillator::Waveform,
    },
    graph::modulator::ModulationSource,
    synth::{
        config::SynthConfig,
        message::{SynthMessage, SynthSnapshot},
        note::Note,
        params,
    },
    SynthError,
};

/// Control-thread side of a running engine.
///
/// The only writer of the command queue. Every call is validated here,
/// before anything is pushed, so the audio thread never sees a bad value.
/// Noise loops are generated on this side too; the engine only swaps
/// pointers and sends the old loop back to be freed here.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
    retired: Consumer<NoiseBuffer>,
    snapshots: Consumer<SynthSnapshot>,
    latest: SynthSnapshot,
    rng: Rng,
    sample_rate: f32,
    /// Color most recently sent to the engine.
    noise_color: NoiseColor,
}

impl SynthHandle {
    pub(crate) fn new(
        tx: Producer<SynthMessage>,
        retired: Consumer<NoiseBuffer>,
        snapshots: Consumer<SynthSnapshot>,
        config: &SynthConfig,
        sample_rate: f32,
    ) -> Self {
        Self {
            tx,
            retired,
            snapshots,
            latest: SynthSnapshot::default(),
            rng: Rng::with_seed(config.noise_seed.rotate_left(32)),
            sample_rate,
            noise_color: config.noise.color,
        }
    }

    fn send(&mut self, msg: SynthMessage) -> Result<(), SynthError> {
        self.collect_retired();

        if self.tx.is_full() {
            warn!("control queue full, command dropped");
            return Err(SynthError::QueueFull);
        }
        self.tx.push(msg).map_err(|_| SynthError::QueueFull)
    }

    /// Free noise loops the engine has swapped out.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while let Ok(buffer) = self.retired.pop() {
            debug!("freeing retired {} noise loop", buffer.color().name());
            count += 1;
        }
        count
    }

    /// Most recent engine state seen by this handle.
    pub fn snapshot(&mut self) -> SynthSnapshot {
        while let Ok(snapshot) = self.snapshots.pop() {
            self.latest = snapshot;
        }
        self.latest
    }

    /// Commands waiting for the audio thread.
    pub fn pending(&self) -> usize {
        self.tx.buffer().capacity() - self.tx.slots()
    }

    pub fn note_on(&mut self, note: Note) -> Result<(), SynthError> {
        let note = params::note(note)?;
        self.send(SynthMessage::NoteOn(note))
    }

    pub fn note_off(&mut self, note: Note) -> Result<(), SynthError> {
        let note = params::note(note)?;
        self.send(SynthMessage::NoteOff(note))
    }

    pub fn all_notes_off(&mut self) -> Result<(), SynthError> {
        self.send(SynthMessage::AllNotesOff)
    }

    pub fn set_pitch_bend(&mut self, semitones: f32) -> Result<(), SynthError> {
        let semitones = params::pitch_bend(semitones)?;
        self.send(SynthMessage::PitchBend { semitones })
    }

    pub fn set_master_volume(&mut self, volume: f32) -> Result<(), SynthError> {
        let volume = params::volume("master_volume", volume)?;
        self.send(SynthMessage::MasterVolume(volume))
    }

    pub fn set_waveform(&mut self, index: usize, waveform: Waveform) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        self.send(SynthMessage::Waveform { index, waveform })
    }

    pub fn set_detune(&mut self, index: usize, cents: f32) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        let cents = params::detune(cents)?;
        self.send(SynthMessage::Detune { index, cents })
    }

    pub fn set_octave(&mut self, index: usize, octave: i32) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        let octave = params::octave(octave)?;
        self.send(SynthMessage::Octave { index, octave })
    }

    pub fn set_oscillator_volume(&mut self, index: usize, volume: f32) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        let volume = params::volume("oscillator_volume", volume)?;
        self.send(SynthMessage::OscillatorVolume { index, volume })
    }

    pub fn set_oscillator_enabled(&mut self, index: usize, enabled: bool) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        self.send(SynthMessage::OscillatorEnabled { index, enabled })
    }

    pub fn set_modulation(
        &mut self,
        amount: f32,
        frequency_hz: f32,
        enabled: bool,
        source: ModulationSource,
    ) -> Result<(), SynthError> {
        params::modulation(amount, frequency_hz)?;
        self.send(SynthMessage::Modulation {
            amount,
            frequency_hz,
            enabled,
            source,
        })
    }

    /// A color change generates the new loop here, off the audio thread.
    pub fn set_noise(&mut self, enabled: bool, color: NoiseColor, volume: f32) -> Result<(), SynthError> {
        let volume = params::volume("noise_volume", volume)?;

        let buffer = if color != self.noise_color {
            debug!("generating {} noise for the audio thread", color.name());
            Some(NoiseBuffer::generate(color, self.sample_rate, &mut self.rng))
        } else {
            None
        };

        self.send(SynthMessage::Noise {
            enabled,
            volume,
            buffer,
        })?;
        self.noise_color = color;
        Ok(())
    }

    pub fn set_filter(&mut self, cutoff_fraction: f32, q: f32) -> Result<(), SynthError> {
        let (cutoff_fraction, q) = params::filter(cutoff_fraction, q)?;
        self.send(SynthMessage::Filter { cutoff_fraction, q })
    }

    pub fn set_envelope(
        &mut self,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Result<(), SynthError> {
        params::envelope(attack, decay, sustain, release)?;
        self.send(SynthMessage::Envelope {
            attack,
            decay,
            sustain,
            release,
        })
    }

    pub fn set_echo(&mut self, delay_seconds: f32, feedback: f32) -> Result<(), SynthError> {
        params::echo(delay_seconds, feedback)?;
        self.send(SynthMessage::Echo {
            delay_seconds,
            feedback,
        })
    }
}
