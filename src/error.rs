use thiserror::Error;

/// Result type for signal-input parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while turning raw user input into signals.
///
/// Parsing is the only fallible stage; the convolution engine and the
/// animation scheduler are total over valid signals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid sample value: '{0}'")]
    InvalidSample(String),

    #[error("Sample list is empty")]
    EmptySampleList,

    #[error("Invalid start index: '{0}'")]
    InvalidStartIndex(String),

    #[error("Invalid {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unknown waveform kind: '{0}'")]
    InvalidWaveform(String),

    #[error("Unknown quality level: '{0}'")]
    InvalidQuality(String),
}
