//! The session state machine: which [`MessageCode`]s a session may legally
//! receive given where it is in the handshake.
//!
//! This module only knows about *state*, not about a session's principal,
//! buffer, or cipher — those live in the server crate, which owns a
//! `SessionState` alongside its own fields and calls [`check_transition`]
//! before acting on an incoming message.

use crate::{MessageCode, ProtocolError};

/// Where a session sits in the handshake / command lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Just accepted; the server has not yet sent `PUBKEY`.
    Accepted,
    /// `PUBKEY` sent; waiting for the client's `AESKEY`.
    AwaitAesKey,
    /// `AESCONF` sent; every subsequent frame is symmetric-encrypted and any
    /// of the authenticated-session codes may arrive in any order.
    Ready,
}

impl SessionState {
    /// Validate that `code` is legal to receive while in this state.
    ///
    /// `PUBKEY`, `AESCONF`, `RCVDMSG`, `SNDMSGCONF`, `LOGGEDOUT` are
    /// server-to-client only and never validated here since they never
    /// arrive as an incoming frame.
    pub fn check_transition(self, code: MessageCode) -> Result<(), ProtocolError> {
        let allowed = match self {
            Self::Accepted => false,
            Self::AwaitAesKey => matches!(code, MessageCode::Aeskey),
            Self::Ready => !matches!(code, MessageCode::Aeskey),
        };
        if allowed {
            Ok(())
        } else {
            Err(ProtocolError::WrongState(code, self))
        }
    }

    /// The state entered after successfully handling `code`.
    pub fn advance(self, code: MessageCode) -> Self {
        match (self, code) {
            (Self::AwaitAesKey, MessageCode::Aeskey) => Self::Ready,
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aeskey_only_legal_while_awaiting() {
        assert!(SessionState::AwaitAesKey.check_transition(MessageCode::Aeskey).is_ok());
        assert!(SessionState::Ready.check_transition(MessageCode::Aeskey).is_err());
        assert!(SessionState::Accepted.check_transition(MessageCode::Aeskey).is_err());
    }

    #[test]
    fn ready_accepts_authenticated_codes() {
        assert!(SessionState::Ready.check_transition(MessageCode::Login).is_ok());
        assert!(SessionState::Ready.check_transition(MessageCode::Sndmsg).is_ok());
    }

    #[test]
    fn aeskey_advances_to_ready() {
        let next = SessionState::AwaitAesKey.advance(MessageCode::Aeskey);
        assert_eq!(next, SessionState::Ready);
    }
}
