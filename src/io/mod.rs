//! The boundary between the engine and whatever plays or stores its output.

pub mod renderer;

pub use renderer::{render_frames, OfflineRenderer, Renderer};
