//! Decode error types for LevelZ elements

/// Errors raised while decoding a single LevelZ element
///
/// Each variant keeps the offending input text so the caller can report it
/// alongside a line number.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed coordinate '{input}': {reason}")]
    MalformedCoordinate { input: String, reason: String },

    #[error("Malformed block spec '{input}': {reason}")]
    MalformedBlockSpec { input: String, reason: String },

    #[error("Malformed matrix '{input}': {reason}")]
    MalformedMatrix { input: String, reason: String },

    #[error("Malformed header '{input}': {reason}")]
    MalformedHeader { input: String, reason: String },

    #[error("Malformed placement '{input}': {reason}")]
    MalformedPlacement { input: String, reason: String },
}

impl DecodeError {
    pub(crate) fn coordinate(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedCoordinate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn block(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedBlockSpec {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn matrix(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedMatrix {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn header(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn placement(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPlacement {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// The raw text that failed to decode
    pub fn input(&self) -> &str {
        match self {
            Self::MalformedCoordinate { input, .. }
            | Self::MalformedBlockSpec { input, .. }
            | Self::MalformedMatrix { input, .. }
            | Self::MalformedHeader { input, .. }
            | Self::MalformedPlacement { input, .. } => input,
        }
    }
}

/// A matrix would expand to more coordinates than the caller allows
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Matrix expands to {size} coordinates (max {max})")]
pub struct MatrixTooLarge {
    pub size: u64,
    pub max: u64,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
