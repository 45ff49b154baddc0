/*
Parameter Automation
====================

Automation describes how a parameter moves over time as a list of scheduled
events, rather than by poking a new value in every sample. The renderer asks
"what is the value at time t?" once per sample and gets a closed-form answer.

Vocabulary
----------

  event         A scheduled instruction with a start (or end) time.

  set           Jump to a value at a time.             set_value_at_time
  linear ramp   Straight line from the previous event  linear_ramp_to_value_at_time
                to a value, arriving at a time.
  target        Exponential approach towards a value,  set_target_at_time
                starting at a time, with a time
                constant tau.

  cancel/hold   Sample the value RIGHT NOW, throw away cancel_and_hold_at_time
                every scheduled event, and pin the
                sampled value at now.


The Curves
----------

  Linear ramp from (t0, v0) to (t1, v1):

      v(t) = v0 + (v1 - v0) * (t - t0) / (t1 - t0)

  Exponential approach towards `target` from (t0, v0):

      v(t) = target + (v0 - target) * e^(-(t - t0) / tau)

  After one tau the value has covered ~63% of the distance, after 5 tau
  ~99.3%. It never reaches the target exactly.

      1.0 ┐╲
          │ ╲
          │  ╲_
          │    ╲__
      tgt ┼────────‾‾‾‾‾‾‾‾‾‾‾‾  (asymptote)
          └──────────────────→ t


Why cancel-and-hold reads the curve
-----------------------------------

A ramp that starts from "whatever was last scheduled" jumps if the old
schedule had not reached its target yet (release during attack, say). The
only click-free start point is the instantaneous value at the moment of
cancellation, so cancel_and_hold evaluates the timeline first and then
overwrites it. Read and overwrite happen in one call on one thread, so two
schedules are never live at once.


Realtime Safety
---------------

Events live in a fixed-size array. Scheduling never allocates; when the
array is full the request is refused and the caller keeps the old schedule.
*/

/// Upper bound on pending events per timeline.
pub const MAX_EVENTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    SetValue { time: f64, value: f32 },
    LinearRamp { time: f64, value: f32 },
    SetTarget { time: f64, target: f32, time_constant: f32 },
}

impl Event {
    fn time(&self) -> f64 {
        match *self {
            Event::SetValue { time, .. }
            | Event::LinearRamp { time, .. }
            | Event::SetTarget { time, .. } => time,
        }
    }
}

/// The value curve in force between two events.
#[derive(Debug, Clone, Copy)]
enum Curve {
    Constant(f32),
    Target {
        start_time: f64,
        start_value: f32,
        target: f32,
        time_constant: f32,
    },
}

impl Curve {
    #[inline]
    fn eval(&self, time: f64) -> f32 {
        match *self {
            Curve::Constant(value) => value,
            Curve::Target {
                start_time,
                start_value,
                target,
                time_constant,
            } => {
                if time_constant <= 0.0 {
                    return target;
                }
                let elapsed = (time - start_time).max(0.0);
                let decay = (-elapsed / time_constant as f64).exp() as f32;
                target + (start_value - target) * decay
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Automation {
    default_value: f32,
    events: [Event; MAX_EVENTS],
    len: usize,
}

impl Automation {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: [Event::SetValue {
                time: 0.0,
                value: default_value,
            }; MAX_EVENTS],
            len: 0,
        }
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> bool {
        self.insert(Event::SetValue { time, value })
    }

    /// Ramp linearly from the previous event so that `value` is reached at `end_time`.
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) -> bool {
        self.insert(Event::LinearRamp {
            time: end_time,
            value,
        })
    }

    pub fn set_target_at_time(&mut self, target: f32, start_time: f64, time_constant: f32) -> bool {
        self.insert(Event::SetTarget {
            time: start_time,
            target,
            time_constant: time_constant.max(0.0),
        })
    }

    /// Drop every scheduled event and pin the instantaneous value at `time`.
    ///
    /// Returns the captured value, which is where any replacement schedule
    /// has to start from.
    pub fn cancel_and_hold_at_time(&mut self, time: f64) -> f32 {
        let held = self.value_at(time);
        self.len = 0;
        self.default_value = held;
        self.insert(Event::SetValue { time, value: held });
        held
    }

    /// Forget all events and rest at `value`.
    pub fn reset(&mut self, value: f32) {
        self.len = 0;
        self.default_value = value;
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time at which the last scheduled event starts (or, for ramps, ends).
    pub fn last_event_time(&self) -> Option<f64> {
        self.scheduled().last().map(Event::time)
    }

    /// Evaluate the timeline at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let mut curve = Curve::Constant(self.default_value);
        let mut previous_time = f64::NEG_INFINITY;

        for event in self.scheduled() {
            match *event {
                Event::SetValue { time: at, value } => {
                    if time < at {
                        break;
                    }
                    curve = Curve::Constant(value);
                }
                Event::LinearRamp { time: end, value } => {
                    if time < end {
                        let start_value = curve.eval(previous_time);
                        let span = end - previous_time;
                        if !span.is_finite() || span <= 0.0 {
                            // No anchor before the ramp: hold until it lands.
                            return start_value;
                        }
                        let progress = ((time - previous_time) / span) as f32;
                        return start_value + (value - start_value) * progress;
                    }
                    curve = Curve::Constant(value);
                }
                Event::SetTarget {
                    time: at,
                    target,
                    time_constant,
                } => {
                    if time < at {
                        break;
                    }
                    curve = Curve::Target {
                        start_time: at,
                        start_value: curve.eval(at),
                        target,
                        time_constant,
                    };
                }
            }
            previous_time = event.time();
        }

        curve.eval(time)
    }

    /// Fill `out` with values sampled at `start_time + i / sample_rate`.
    pub fn render(&self, out: &mut [f32], start_time: f64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start_time + i as f64 * dt);
        }
    }

    fn scheduled(&self) -> &[Event] {
        &self.events[..self.len]
    }

    fn insert(&mut self, event: Event) -> bool {
        if self.len == MAX_EVENTS || !event.time().is_finite() {
            return false;
        }

        // Keep events ordered by time; equal times keep insertion order.
        let at = self.scheduled().partition_point(|e| e.time() <= event.time());
        self.events.copy_within(at..self.len, at + 1);
        self.events[at] = event;
        self.len += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value_before_any_event() {
        let auto = Automation::new(0.25);
        assert_eq!(auto.value_at(0.0), 0.25);
        assert_eq!(auto.value_at(10.0), 0.25);
    }

    #[test]
    fn set_value_takes_effect_at_its_time() {
        let mut auto = Automation::new(0.0);
        auto.set_value_at_time(0.8, 1.0);

        assert_eq!(auto.value_at(0.999), 0.0);
        assert_eq!(auto.value_at(1.0), 0.8);
        assert_eq!(auto.value_at(5.0), 0.8);
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_event() {
        let mut auto = Automation::new(0.0);
        auto.set_value_at_time(0.0, 1.0);
        auto.linear_ramp_to_value_at_time(1.0, 3.0);

        assert!((auto.value_at(2.0) - 0.5).abs() < 1e-6);
        assert!((auto.value_at(2.5) - 0.75).abs() < 1e-6);
        assert_eq!(auto.value_at(3.0), 1.0);
        assert_eq!(auto.value_at(4.0), 1.0);
    }

    #[test]
    fn target_covers_63_percent_after_one_time_constant() {
        let mut auto = Automation::new(1.0);
        auto.set_value_at_time(1.0, 0.0);
        auto.set_target_at_time(0.0, 0.0, 0.5);

        let after_tau = auto.value_at(0.5);
        let expected = (-1.0f32).exp();
        assert!(
            (after_tau - expected).abs() < 1e-4,
            "expected {expected}, got {after_tau}"
        );

        // Asymptotic: never crosses the target
        assert!(auto.value_at(20.0) > 0.0);
    }

    #[test]
    fn target_starts_from_end_of_preceding_ramp() {
        let mut auto = Automation::new(0.0);
        auto.set_value_at_time(0.0, 0.0);
        auto.linear_ramp_to_value_at_time(1.0, 1.0);
        auto.set_target_at_time(0.3, 1.0, 0.2);

        assert!((auto.value_at(1.0) - 1.0).abs() < 1e-6);
        let later = auto.value_at(1.2);
        let expected = 0.3 + 0.7 * (-1.0f32).exp();
        assert!((later - expected).abs() < 1e-4);
    }

    #[test]
    fn cancel_and_hold_captures_instantaneous_value() {
        let mut auto = Automation::new(0.0);
        auto.set_value_at_time(0.0, 0.0);
        auto.linear_ramp_to_value_at_time(1.0, 1.0);

        let before = auto.value_at(0.4);
        let held = auto.cancel_and_hold_at_time(0.4);

        assert!((held - 0.4).abs() < 1e-6);
        assert!((before - held).abs() < 1e-6);
        // The old ramp is gone: value stays pinned
        assert!((auto.value_at(0.9) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn ramp_after_cancel_starts_without_jump() {
        let mut auto = Automation::new(0.0);
        auto.set_value_at_time(1.0, 0.0);
        auto.set_target_at_time(0.2, 0.0, 0.3);

        let now = 0.37;
        let held = auto.cancel_and_hold_at_time(now);
        auto.linear_ramp_to_value_at_time(0.0, now + 1.0);

        let eps = 1e-5;
        assert!((auto.value_at(now) - held).abs() < 1e-6);
        assert!((auto.value_at(now + eps) - held).abs() < 1e-3);
        assert_eq!(auto.value_at(now + 1.0), 0.0);
    }

    #[test]
    fn out_of_order_events_are_sorted() {
        let mut auto = Automation::new(0.0);
        auto.set_value_at_time(0.5, 2.0);
        auto.set_value_at_time(0.1, 1.0);

        assert_eq!(auto.value_at(1.5), 0.1);
        assert_eq!(auto.value_at(2.5), 0.5);
        assert_eq!(auto.last_event_time(), Some(2.0));
    }

    #[test]
    fn full_timeline_refuses_new_events() {
        let mut auto = Automation::new(0.0);
        for i in 0..MAX_EVENTS {
            assert!(auto.set_value_at_time(i as f32, i as f64));
        }
        assert!(!auto.set_value_at_time(99.0, 100.0));
        assert_eq!(auto.value_at(100.0), (MAX_EVENTS - 1) as f32);
    }

    #[test]
    fn non_finite_times_are_refused() {
        let mut auto = Automation::new(0.0);
        assert!(!auto.set_value_at_time(1.0, f64::NAN));
        assert!(auto.is_empty());
    }
}
