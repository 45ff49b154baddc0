use crate::{
    dsp::envelope::EnvelopeStage,
    graph::{envelope::EnvNode, oscillator::OscNode},
    synth::{
        note::{frequency, Note},
        note_stack::NoteStack,
    },
    OSCILLATOR_COUNT,
};

/*
Voice Controller
================

One voice, many keys. The controller keeps the stack of held notes and
decides what the oscillator bank plays:

    held:      {}      {A4}    {A4, A5}   {A4}     {}
    event:          on A4    on A5     off A5    off A4
    sounds:    -       A4      A5         A4       (release tail of A4)
    envelope:  idle  attack  retrigger  untouched  release

Rules:

  - The highest held note always sounds.
  - Every accepted note-on retriggers the envelope. The new attack starts
    from the level sounding right now (legato), or from 0 when no key was
    held before.
  - Releasing a key while others are held only retunes; the envelope keeps
    going. Releasing the last key starts the release.
  - Pressing a key that is already held changes nothing.

Retuning touches every oscillator, routed or not, so a voice that is
switched back on is already at the right pitch.
*/

pub struct VoiceController {
    stack: NoteStack,
    pitch_bend: f32,
    /// Note the oscillators are tuned to. Survives the last note-off so the
    /// release tail keeps its pitch.
    tuned: Option<Note>,
    oscillators: [OscNode; OSCILLATOR_COUNT],
    envelope: EnvNode,
}

impl VoiceController {
    pub fn new(oscillators: [OscNode; OSCILLATOR_COUNT], envelope: EnvNode) -> Self {
        Self {
            stack: NoteStack::new(),
            pitch_bend: 0.0,
            tuned: None,
            oscillators,
            envelope,
        }
    }

    /// Press a key at clock time `now`. Returns false if nothing changed.
    pub fn note_on(&mut self, note: Note, now: f64) -> bool {
        let was_empty = self.stack.is_empty();
        if !self.stack.insert(note) {
            return false;
        }

        self.retune();

        let start = if was_empty {
            0.0
        } else {
            self.envelope.level_at(now)
        };
        self.envelope.attack_from(start, now);
        true
    }

    /// Release a key at clock time `now`. Returns false if it was not held.
    pub fn note_off(&mut self, note: Note, now: f64) -> bool {
        if !self.stack.remove(note) {
            return false;
        }

        if self.stack.is_empty() {
            self.envelope.release(now);
        } else {
            self.retune();
        }
        true
    }

    pub fn all_notes_off(&mut self, now: f64) {
        if !self.stack.is_empty() {
            self.stack.clear();
            self.envelope.release(now);
        }
    }

    pub fn set_pitch_bend(&mut self, semitones: f32) {
        self.pitch_bend = semitones;
        self.retune();
    }

    pub fn pitch_bend(&self) -> f32 {
        self.pitch_bend
    }

    /// Change one oscillator's octave and retune it in place.
    pub fn set_octave(&mut self, index: usize, octave: i32) {
        if let Some(osc) = self.oscillators.get_mut(index) {
            osc.set_octave(octave);
        }
        self.retune();
    }

    /// The highest held note.
    pub fn sounding(&self) -> Option<Note> {
        self.stack.top()
    }

    pub fn held(&self) -> usize {
        self.stack.len()
    }

    pub fn stage_at(&self, time: f64) -> EnvelopeStage {
        self.envelope.stage_at(time)
    }

    pub fn level_at(&self, time: f64) -> f32 {
        self.envelope.level_at(time)
    }

    pub fn oscillators(&self) -> &[OscNode; OSCILLATOR_COUNT] {
        &self.oscillators
    }

    pub fn oscillators_mut(&mut self) -> &mut [OscNode; OSCILLATOR_COUNT] {
        &mut self.oscillators
    }

    pub fn envelope(&self) -> &EnvNode {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut EnvNode {
        &mut self.envelope
    }

    /// Point every oscillator at the highest held note (or the last one
    /// played, during the release tail).
    fn retune(&mut self) {
        if let Some(top) = self.stack.top() {
            self.tuned = Some(top);
        }
        let Some(note) = self.tuned else {
            return;
        };

        for osc in self.oscillators.iter_mut() {
            osc.set_frequency(frequency(note, osc.octave(), self.pitch_bend));
        }
    }
}
