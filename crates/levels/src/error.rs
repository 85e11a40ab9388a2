//! Error types for the levels crate

use levelz_core::{DecodeError, Dimension};
use std::path::PathBuf;

/// Broad error categories, for callers that only need to branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedHeader,
    TypeMismatch,
    MalformedCoordinate,
    MalformedMatrix,
    MalformedBlockSpec,
    MalformedPlacement,
    MatrixTooLarge,
    UnexpectedEndOfInput,
    UnknownDimension,
    Io,
}

/// Level-specific error types
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// File I/O error
    #[error("File error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A header, block, coordinate or matrix failed to decode
    #[error("Parse error at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },

    /// The `type` header disagrees with the requested dimensionality
    #[error("Type mismatch at line {line}: expected type {expected}, found '{found}'")]
    TypeMismatch {
        line: usize,
        expected: Dimension,
        found: String,
    },

    /// A matrix expands past the configured maximum
    #[error("Matrix too large at line {line}: '{matrix}' expands to {size} coordinates (max {max})")]
    MatrixTooLarge {
        line: usize,
        matrix: String,
        size: u64,
        max: u64,
    },

    /// A line ended before a required part
    #[error("Unexpected end of input at line {line}: {message}")]
    UnexpectedEndOfInput { line: usize, message: String },

    /// No usable `type` header to pick a dimensionality from
    #[error("Unknown level dimension: {0}")]
    UnknownDimension(String),
}

impl LevelError {
    pub(crate) fn decode(line: usize) -> impl Fn(DecodeError) -> LevelError {
        move |source| LevelError::Decode { line, source }
    }

    /// The error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            LevelError::Io { .. } => ErrorKind::Io,
            LevelError::Decode { source, .. } => match source {
                DecodeError::MalformedCoordinate { .. } => ErrorKind::MalformedCoordinate,
                DecodeError::MalformedBlockSpec { .. } => ErrorKind::MalformedBlockSpec,
                DecodeError::MalformedMatrix { .. } => ErrorKind::MalformedMatrix,
                DecodeError::MalformedHeader { .. } => ErrorKind::MalformedHeader,
                DecodeError::MalformedPlacement { .. } => ErrorKind::MalformedPlacement,
            },
            LevelError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            LevelError::MatrixTooLarge { .. } => ErrorKind::MatrixTooLarge,
            LevelError::UnexpectedEndOfInput { .. } => ErrorKind::UnexpectedEndOfInput,
            LevelError::UnknownDimension(_) => ErrorKind::UnknownDimension,
        }
    }

    /// 1-based line the error was raised on, when it came from the parser
    pub fn line(&self) -> Option<usize> {
        match self {
            LevelError::Decode { line, .. }
            | LevelError::TypeMismatch { line, .. }
            | LevelError::MatrixTooLarge { line, .. }
            | LevelError::UnexpectedEndOfInput { line, .. } => Some(*line),
            LevelError::Io { .. } | LevelError::UnknownDimension(_) => None,
        }
    }
}

/// Result type for level operations
pub type Result<T> = std::result::Result<T, LevelError>;
