pub mod dsp;
pub mod error;
pub mod graph; // Signal-graph nodes wired by the engine
pub mod io; // Renderer boundary
pub mod synth; // Note stack, control surface, engine

pub use error::SynthError;
pub use synth::{
    config::SynthConfig,
    engine::MonoSynth,
    handle::SynthHandle,
    message::SynthSnapshot,
    note::Note,
};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Number of oscillator voices in the bank.
pub const OSCILLATOR_COUNT: usize = 3;
