//! Whole-engine benchmarks.
//!
//! These render the synth exactly as the audio callback does, including the
//! command queue drain at the top of each block.

mod synth;

pub use synth::bench_synth;
