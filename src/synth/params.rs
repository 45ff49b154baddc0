//! Parameter domains shared by every control path.
//!
//! `MonoSynth` setters, `SynthHandle` and `SynthConfig::validate` all run the
//! same checks, so a value that is rejected on one path is rejected on all of
//! them, and always before anything is mutated or queued.

use log::warn;

use crate::{graph::echo::MAX_ECHO_SECONDS, synth::note::Note, SynthError, OSCILLATOR_COUNT};

/// Largest detune in cents (one octave either way).
pub const MAX_DETUNE_CENTS: f32 = 1200.0;
/// Largest pitch bend in semitones (four octaves either way).
pub const MAX_PITCH_BEND: f32 = 48.0;
/// Lowest playable note, MIDI note 0 (C-1).
pub const MIN_NOTE: Note = Note(-69);
/// Highest playable note, MIDI note 127 (G9).
pub const MAX_NOTE: Note = Note(58);
/// Highest octave number a voice can be shifted to.
pub const MAX_OCTAVE: i32 = 8;
/// Highest resonance accepted (linear, about 32 dB).
pub const MAX_Q: f32 = 40.0;
/// Fastest LFO rate in Hz.
pub const MAX_LFO_HZ: f32 = 100.0;
/// Deepest frequency modulation in Hz.
pub const MAX_MODULATION_HZ: f32 = 2_000.0;

fn reject(name: &'static str, value: f32) -> SynthError {
    warn!("rejected {name} = {value}");
    SynthError::InvalidParameter { name, value }
}

fn in_range(name: &'static str, value: f32, lo: f32, hi: f32) -> Result<f32, SynthError> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(value)
    } else {
        Err(reject(name, value))
    }
}

pub fn oscillator_index(index: usize) -> Result<usize, SynthError> {
    if index < OSCILLATOR_COUNT {
        Ok(index)
    } else {
        warn!("rejected oscillator index {index}");
        Err(SynthError::InvalidIndex {
            index,
            count: OSCILLATOR_COUNT,
        })
    }
}

pub fn sample_rate(rate: f32) -> Result<f32, SynthError> {
    if rate.is_finite() && rate >= 1_000.0 {
        Ok(rate)
    } else {
        Err(SynthError::InvalidSampleRate(rate))
    }
}

/// Gain in [0, 1].
pub fn volume(name: &'static str, value: f32) -> Result<f32, SynthError> {
    in_range(name, value, 0.0, 1.0)
}

pub fn pitch_bend(semitones: f32) -> Result<f32, SynthError> {
    in_range("pitch_bend", semitones, -MAX_PITCH_BEND, MAX_PITCH_BEND)
}

/// Notes in the MIDI range. With every octave, detune and bend at its limit
/// the highest voice stays a finite frequency.
pub fn note(note: Note) -> Result<Note, SynthError> {
    if (MIN_NOTE..=MAX_NOTE).contains(&note) {
        Ok(note)
    } else {
        warn!("rejected note {}", note.semitones());
        Err(SynthError::InvalidNote(note.to_string()))
    }
}

pub fn detune(cents: f32) -> Result<f32, SynthError> {
    in_range("detune", cents, -MAX_DETUNE_CENTS, MAX_DETUNE_CENTS)
}

pub fn octave(octave: i32) -> Result<i32, SynthError> {
    if (0..=MAX_OCTAVE).contains(&octave) {
        Ok(octave)
    } else {
        Err(reject("octave", octave as f32))
    }
}

/// Cutoff fraction of Nyquist in (0, 1] and a positive, bounded Q.
pub fn filter(cutoff_fraction: f32, q: f32) -> Result<(f32, f32), SynthError> {
    if !(cutoff_fraction.is_finite() && cutoff_fraction > 0.0 && cutoff_fraction <= 1.0) {
        return Err(reject("cutoff", cutoff_fraction));
    }
    if !(q.is_finite() && q > 0.0 && q <= MAX_Q) {
        return Err(reject("q", q));
    }
    Ok((cutoff_fraction, q))
}

/// Attack, decay and release as fractions of the max duration, sustain as a level.
pub fn envelope(attack: f32, decay: f32, sustain: f32, release: f32) -> Result<(), SynthError> {
    in_range("attack", attack, 0.0, 1.0)?;
    in_range("decay", decay, 0.0, 1.0)?;
    in_range("sustain", sustain, 0.0, 1.0)?;
    in_range("release", release, 0.0, 1.0)?;
    Ok(())
}

pub fn echo(delay_seconds: f32, feedback: f32) -> Result<(), SynthError> {
    in_range("echo_delay", delay_seconds, 0.0, MAX_ECHO_SECONDS)?;
    if !(feedback.is_finite() && (0.0..1.0).contains(&feedback)) {
        return Err(reject("echo_feedback", feedback));
    }
    Ok(())
}

pub fn modulation(amount: f32, frequency_hz: f32) -> Result<(), SynthError> {
    if !(amount.is_finite() && (0.0..=MAX_MODULATION_HZ).contains(&amount)) {
        return Err(reject("modulation_amount", amount));
    }
    if !(frequency_hz.is_finite() && frequency_hz > 0.0 && frequency_hz <= MAX_LFO_HZ) {
        return Err(reject("modulation_frequency", frequency_hz));
    }
    Ok(())
}
