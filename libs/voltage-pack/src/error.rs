//! Pack/Unpack Error Types
//!
//! Every error is terminal for the current call: `pack` returns no buffer
//! and `unpack` returns no mapping. Recoverable conditions are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

use thiserror::Error;

/// Result type for voltage-pack operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Malformed format string
    #[error("Format error: type {code} at position {position}: {reason}")]
    Format {
        code: char,
        position: usize,
        reason: String,
    },

    /// Argument list or input buffer does not match the format
    #[error("Argument error: {0}")]
    Argument(String),

    /// Output position no longer fits the platform's address range
    #[error("Overflow error: {0}")]
    Overflow(String),

    /// Text argument is not a valid number
    #[error("Parse error: {0}")]
    Parse(String),

    /// Argument kind has no conversion to what the directive needs
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Unpack offset points past the end of the input
    #[error("Offset {offset} is out of range for input of {len} bytes")]
    Range { offset: usize, len: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for PackError {
    fn from(err: figment::Error) -> Self {
        PackError::Config(err.to_string())
    }
}

// Helper methods for creating errors
impl PackError {
    pub fn format(code: char, position: usize, reason: impl Into<String>) -> Self {
        PackError::Format {
            code,
            position,
            reason: reason.into(),
        }
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        PackError::Argument(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        PackError::Overflow(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        PackError::Parse(msg.into())
    }

    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        PackError::UnsupportedType(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PackError::Config(msg.into())
    }

    /// Stable name of the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            PackError::Format { .. } => "format",
            PackError::Argument(_) => "argument",
            PackError::Overflow(_) => "overflow",
            PackError::Parse(_) => "parse",
            PackError::UnsupportedType(_) => "unsupported_type",
            PackError::Range { .. } => "range",
            PackError::Config(_) => "config",
        }
    }
}
