//! Errors the controller surfaces to its caller.

use std::fmt;

use proconq_tracer::TracerError;

/// Errors from spawning or driving the interceptor helper.
#[derive(Debug)]
pub enum CtlError {
    /// Spawning the helper subprocess failed.
    Spawn(std::io::Error),
    /// Writing a reply to the helper's stdin failed.
    Write(std::io::Error),
    /// The helper's output could not be parsed, or it reported an error on stderr.
    Tracer(TracerError),
}

impl fmt::Display for CtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to spawn interceptor: {e}"),
            Self::Write(e) => write!(f, "failed to write to interceptor: {e}"),
            Self::Tracer(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CtlError {}

impl From<TracerError> for CtlError {
    fn from(e: TracerError) -> Self {
        Self::Tracer(e)
    }
}
