//! Errors produced while parsing the tracer line protocol.

use std::fmt;

/// Something about the helper's output could not be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum TracerError {
    /// A header line was shorter than the fixed columns it must contain.
    TruncatedHeader,
    /// The direction column was neither `E` nor `R`.
    UnknownDirection(char),
    /// Any byte was read from the helper's stderr — treated as fatal.
    HelperFailed(String),
}

impl fmt::Display for TracerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedHeader => write!(f, "syscall header line is truncated"),
            Self::UnknownDirection(c) => write!(f, "unknown syscall direction {c:?}"),
            Self::HelperFailed(msg) => write!(f, "interceptor reported an error: {msg}"),
        }
    }
}

impl std::error::Error for TracerError {}
