//! Protocol-level errors — malformed or out-of-state messages.

use std::fmt;

use crate::{MessageCode, SessionState};

/// A frame parsed correctly at the wire level but violated the message codec
/// or the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// The `CODE` field did not match any known [`MessageCode`].
    UnknownCode(String),
    /// The body did not match the shape required for this code.
    MalformedBody(MessageCode),
    /// The code is known but not legal to receive in the session's current state.
    WrongState(MessageCode, SessionState),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode(c) => write!(f, "unknown message code {c:?}"),
            Self::MalformedBody(c) => write!(f, "malformed body for {c:?}"),
            Self::WrongState(c, s) => write!(f, "{c:?} is not valid in state {s:?}"),
        }
    }
}

impl std::error::Error for ProtocolError {}
