use std::fmt;

/// Everything a control call or engine construction can be rejected with.
///
/// Rejections happen before any state is touched, so an `Err` always means
/// the engine is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    InvalidIndex { index: usize, count: usize },
    InvalidParameter { name: &'static str, value: f32 },
    InvalidSampleRate(f32),
    InvalidNote(String),
    RendererUnavailable(String),
    QueueFull,
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::InvalidIndex { index, count } => {
                write!(f, "oscillator index {index} out of range (0..{count})")
            }
            SynthError::InvalidParameter { name, value } => {
                write!(f, "invalid value {value} for parameter '{name}'")
            }
            SynthError::InvalidSampleRate(rate) => write!(f, "invalid sample rate {rate} Hz"),
            SynthError::InvalidNote(text) => write!(f, "invalid or unplayable note '{text}'"),
            SynthError::RendererUnavailable(reason) => {
                write!(f, "audio renderer unavailable: {reason}")
            }
            SynthError::QueueFull => write!(f, "control queue is full"),
        }
    }
}

impl std::error::Error for SynthError {}
