//! Signal-graph nodes wired together by the engine.
//!
//! Graph nodes wrap the low-level DSP primitives with what the instrument
//! needs: clock-stamped gate edges, routed flags, parameters in control-surface
//! units, and block-based rendering. The topology is fixed; the engine owns
//! one of each node and calls them in order every block.

/// Feedback echo with a fixed-capacity delay line.
pub mod echo;
/// Envelope node gating the voice path.
pub mod envelope;
/// Resonant lowpass with cutoff as a fraction of Nyquist.
pub mod filter;
/// LFO or noise frequency modulator.
pub mod modulator;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audible noise voice.
pub mod noise;
/// Detunable, routable oscillator voice.
pub mod oscillator;

pub use modulator::ModulationSource;
pub use node::{GraphNode, RenderCtx};
