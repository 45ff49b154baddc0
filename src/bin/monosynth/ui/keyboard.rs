//! Computer keyboard as a two-octave piano
//!
//!   upper row:   2 3   5 6 7   9 0        (black keys)
//!               q w e r t y u i o p       C D E F G A B C D E  (octave + 1)
//!   lower row:   s d   g h j   l ;        (black keys)
//!               z x c v b n m , . /       C D E F G A B C D E  (base octave)

use monosynth::{graph::oscillator::REFERENCE_OCTAVE, Note};

pub const MIN_OCTAVE: i32 = 1;
pub const MAX_OCTAVE: i32 = 7;

/// Semitones above C of the base octave.
fn semitone(key: char) -> Option<i32> {
    let offset = match key {
        'z' => 0,
        's' => 1,
        'x' => 2,
        'd' => 3,
        'c' => 4,
        'v' => 5,
        'g' => 6,
        'b' => 7,
        'h' => 8,
        'n' => 9,
        'j' => 10,
        'm' => 11,
        ',' => 12,
        'l' => 13,
        '.' => 14,
        ';' => 15,
        '/' => 16,

        'q' => 12,
        '2' => 13,
        'w' => 14,
        '3' => 15,
        'e' => 16,
        'r' => 17,
        '5' => 18,
        't' => 19,
        '6' => 20,
        'y' => 21,
        '7' => 22,
        'u' => 23,
        'i' => 24,
        '9' => 25,
        'o' => 26,
        '0' => 27,
        'p' => 28,
        _ => return None,
    };
    Some(offset)
}

/// Note played by `key` with the lower row starting at C`octave`.
pub fn note_for_key(key: char, octave: i32) -> Option<Note> {
    let c = Note::C4.transpose((octave - REFERENCE_OCTAVE) * 12);
    semitone(key.to_ascii_lowercase()).map(|offset| c.transpose(offset))
}
