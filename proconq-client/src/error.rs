//! Client-side error type, wrapping each layer it talks through.

use std::fmt;

use proconq_crypto::CryptoError;
use proconq_protocol::{FramingError, ProtocolError};

#[derive(Debug)]
pub enum ClientError {
    Io(std::io::Error),
    Framing(FramingError),
    Crypto(CryptoError),
    Protocol(ProtocolError),
    /// The handshake did not proceed in the expected `PUBKEY`/`AESKEY`/`AESCONF` order.
    HandshakeFailed,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Framing(e) => write!(f, "framing error: {e}"),
            Self::Crypto(e) => write!(f, "crypto error: {e}"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
            Self::HandshakeFailed => write!(f, "handshake did not complete"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FramingError> for ClientError {
    fn from(e: FramingError) -> Self {
        Self::Framing(e)
    }
}

impl From<CryptoError> for ClientError {
    fn from(e: CryptoError) -> Self {
        Self::Crypto(e)
    }
}

impl From<ProtocolError> for ClientError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}
