use crate::{dsp::automation::Automation, MIN_TIME};

/*
ADSR Envelope Implementation
============================

The envelope is the gain gate between the oscillator mix and the effects. It
is not a per-sample state machine: every gate edge is turned into a schedule
on an `Automation` timeline and the renderer evaluates that timeline at the
clock time of each sample.

Vocabulary
----------

  level         The envelope's output (0.0 to 1.0) at a given clock time.

  stage         Idle, Attack, Decay, Sustain or Release. Derived from the
                schedule and the clock, never stored per sample.

  max_duration  Scale for the time parameters. attack/decay/release are
                fractions (0.0 - 1.0) of this many seconds.

  legato        A new attack that starts from the level that is sounding
                right now instead of from zero.


The Shape
---------

  Level
    1.0 ┐     ╱‾╲
        │    ╱   ‾╲_
    S   │   ╱       ‾‾‾‾‾‾‾‾╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release
        linear  exp    (exp)   linear

  Attack   linear ramp from the start level to 1.0 over attack * max_duration
  Decay    exponential approach towards sustain, time constant
           decay * max_duration. The approach is asymptotic, so "Sustain" is
           simply the tail of the same curve once it is within
           SUSTAIN_EPSILON of the sustain level.
  Release  linear ramp from the level at note-off time to 0.0 over
           release * max_duration


Retriggering
------------

attack_from() and release() both start with cancel_and_hold on the
timeline. The replacement curve therefore always begins at the true
instantaneous level and there is no jump at the edge:

    release during attack:      ╱╲        (not ╱|‾╲)
    legato retrigger in decay:  ╱‾╲_╱‾╲_  (not ╱‾╲_|╱‾╲_)
*/

/// Distance from the sustain level at which Decay is reported as Sustain.
pub const SUSTAIN_EPSILON: f32 = 1e-3;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Closed,
    Open,
    Releasing,
}

pub struct Envelope {
    // Shape parameters (fractions of max_duration, sustain is a level)
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    max_duration: f32,

    gain: Automation,
    gate: Gate,
    attack_end: f64,
    release_end: f64,
}

impl Envelope {
    pub fn new() -> Self {
        Self::adsr(0.1, 0.2, 0.3, 0.4, 2.0)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32, max_duration: f32) -> Self {
        let mut env = Self {
            attack: 0.0,
            decay: 0.0,
            sustain: 0.0,
            release: 0.0,
            max_duration: max_duration.max(MIN_TIME),
            gain: Automation::new(0.0),
            gate: Gate::Closed,
            attack_end: 0.0,
            release_end: 0.0,
        };
        env.set_adsr(attack, decay, sustain, release);
        env
    }

    /// Update the shape. Takes effect on the next gate edge.
    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack.max(0.0);
        self.decay = decay.max(0.0);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.max(0.0);
    }

    pub fn attack_seconds(&self) -> f32 {
        (self.attack * self.max_duration).max(MIN_TIME)
    }

    pub fn decay_time_constant(&self) -> f32 {
        self.decay * self.max_duration
    }

    pub fn release_seconds(&self) -> f32 {
        (self.release * self.max_duration).max(MIN_TIME)
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain
    }

    /// Gate high: ramp from `start` to full level, then fall towards sustain.
    pub fn attack_from(&mut self, start: f32, now: f64) {
        let start = start.clamp(0.0, 1.0);
        let attack_end = now + self.attack_seconds() as f64;

        self.gain.cancel_and_hold_at_time(now);
        self.gain.set_value_at_time(start, now);
        self.gain.linear_ramp_to_value_at_time(1.0, attack_end);
        self.gain
            .set_target_at_time(self.sustain, attack_end, self.decay_time_constant());

        self.attack_end = attack_end;
        self.gate = Gate::Open;
    }

    /// Gate low: ramp from the level sounding at `now` down to zero.
    ///
    /// Returns the captured start level.
    pub fn release(&mut self, now: f64) -> f32 {
        if self.gate == Gate::Closed {
            return 0.0;
        }

        let held = self.gain.cancel_and_hold_at_time(now);
        let release_end = now + self.release_seconds() as f64;
        self.gain.linear_ramp_to_value_at_time(0.0, release_end);

        self.release_end = release_end;
        self.gate = Gate::Releasing;
        held
    }

    pub fn level_at(&self, time: f64) -> f32 {
        self.gain.value_at(time).clamp(0.0, 1.0)
    }

    pub fn stage_at(&self, time: f64) -> EnvelopeStage {
        match self.gate {
            Gate::Closed => EnvelopeStage::Idle,
            Gate::Open if time < self.attack_end => EnvelopeStage::Attack,
            Gate::Open => {
                if (self.gain.value_at(time) - self.sustain).abs() > SUSTAIN_EPSILON {
                    EnvelopeStage::Decay
                } else {
                    EnvelopeStage::Sustain
                }
            }
            Gate::Releasing if time < self.release_end => EnvelopeStage::Release,
            Gate::Releasing => EnvelopeStage::Idle,
        }
    }

    pub fn is_active_at(&self, time: f64) -> bool {
        self.stage_at(time) != EnvelopeStage::Idle
    }

    /// Render a block of gain values starting at clock time `start_time`.
    pub fn render(&mut self, buffer: &mut [f32], start_time: f64, sample_rate: f32) {
        self.gain.render(buffer, start_time, sample_rate);

        // Retire a finished release so the timeline does not grow stale.
        let block_end = start_time + buffer.len() as f64 / sample_rate as f64;
        if self.gate == Gate::Releasing && block_end >= self.release_end {
            self.gate = Gate::Closed;
            self.gain.reset(0.0);
        }
    }

    pub fn reset(&mut self) {
        self.gate = Gate::Closed;
        self.gain.reset(0.0);
        self.attack_end = 0.0;
        self.release_end = 0.0;
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
