//! Low-level DSP primitives used by the graph nodes.
//!
//! These components do not allocate after construction and are safe to run
//! on the audio thread (noise *generation* is the exception and is kept to
//! construction time and the control side). They stay focused on the
//! signal-processing math; routing and parameter ownership live in `graph`.

/// Scheduled parameter curves: set, linear ramp, exponential approach.
pub mod automation;
/// Time-domain delay line.
pub mod delay;
/// Attack/decay/sustain/release envelope built on automation.
pub mod envelope;
/// Resonant state-variable lowpass.
pub mod filter;
/// White and pink noise loops.
pub mod noise;
/// Phase-accumulator waveforms.
pub mod oscillator;

pub use envelope::EnvelopeStage;
pub use noise::NoiseColor;
pub use oscillator::Waveform;
