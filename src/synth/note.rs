use std::{fmt, str::FromStr};

use crate::{
    error::SynthError,
    graph::oscillator::REFERENCE_OCTAVE,
    synth::params::{MAX_NOTE, MIN_NOTE},
};

/*
Notes and Pitch
===============

A note is a signed semitone offset from A4 (concert A, 440 Hz):

    ... G#3  A3  ...  C4  ...  G#4  A4  A#4  B4  C5 ...
        -13  -12      -9       -1   0    1    2   3

Equal temperament, twelve equal steps per octave:

    f(n) = 440 · 2^(n / 12)

Each oscillator voice adds its own octave shift (REFERENCE_OCTAVE = 4 is
unison) and the whole instrument shares a pitch bend in semitones:

    f = 440 · 2^((n + (octave - 4) · 12) / 12) · 2^(bend / 12)

Names use scientific pitch notation: a letter, an optional sharp or flat,
and an octave number. "C4" is middle C, "Bb3" and "A#3" are the same note.
Playable notes span the MIDI range, C-1 (-69) to G9 (+58).
*/

pub const A4_FREQUENCY: f32 = 440.0;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note(pub i32);

impl Note {
    pub const A4: Note = Note(0);
    pub const C4: Note = Note(-9);

    pub fn semitones(self) -> i32 {
        self.0
    }

    /// Concert-pitch frequency with no octave shift or bend.
    pub fn frequency(self) -> f32 {
        frequency(self, REFERENCE_OCTAVE, 0.0)
    }

    /// Shift by a number of semitones, saturating at the `i32` range.
    pub fn transpose(self, semitones: i32) -> Note {
        Note(self.0.saturating_add(semitones))
    }
}

/// Frequency of `note` played by a voice at `octave` with `bend` semitones of pitch bend.
///
/// Never panics; out-of-range input saturates to `f32::MAX` or 0 rather than
/// producing infinity.
pub fn frequency(note: Note, octave: i32, bend: f32) -> f32 {
    let shift = octave.saturating_sub(REFERENCE_OCTAVE).saturating_mul(12);
    let semitones = note.0.saturating_add(shift);
    let hz = A4_FREQUENCY * 2.0_f32.powf((semitones as f32 + bend) / 12.0);
    hz.min(f32::MAX)
}

const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Semitones from C0
        let from_c0 = self.0.saturating_add(9 + 4 * 12);
        let octave = from_c0.div_euclid(12);
        let name = NAMES[from_c0.rem_euclid(12) as usize];
        write!(f, "{name}{octave}")
    }
}

impl FromStr for Note {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SynthError::InvalidNote(s.to_string());
        let mut chars = s.trim().chars();

        let letter = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => -9,
            Some('D') => -7,
            Some('E') => -5,
            Some('F') => -4,
            Some('G') => -2,
            Some('A') => 0,
            Some('B') => 2,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
            (1, octave)
        } else if let Some(octave) = rest.strip_prefix('b') {
            (-1, octave)
        } else {
            (0, rest)
        };

        let octave: i32 = octave.parse().map_err(|_| invalid())?;
        if !(-1..=9).contains(&octave) {
            return Err(invalid());
        }

        let note = Note(letter + accidental + (octave - 4) * 12);
        if !(MIN_NOTE..=MAX_NOTE).contains(&note) {
            return Err(invalid());
        }
        Ok(note)
    }
}
