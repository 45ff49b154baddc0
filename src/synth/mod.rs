//! The instrument: note stack, voice policy, control surface and engine.
//!
//! This layer sits above the graph nodes. `MonoSynth` owns one of each node
//! and renders them in a fixed order; `SynthHandle` is the control thread's
//! way in while the engine runs on the audio thread.

pub mod config;
pub mod engine;
pub mod handle;
pub mod message;
pub mod note;
pub mod note_stack;
pub mod params;
pub mod voice;

pub use message::{SynthMessage, SynthSnapshot};
