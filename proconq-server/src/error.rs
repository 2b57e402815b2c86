//! The server's unified error enum, following the `InvocationError` /
//! `DecryptError` convention: a flat enum, manual `Display`, `From` at
//! crate boundaries.

use std::fmt;

use proconq_crypto::CryptoError;
use proconq_protocol::{FramingError, ProtocolError};

use crate::allocator::AllocationError;

/// Any error that can terminate a single connection's handling loop.
#[derive(Debug)]
pub enum ServerError {
    Framing(FramingError),
    Crypto(CryptoError),
    Protocol(ProtocolError),
    Allocation(AllocationError),
    Io(std::io::Error),
    Store(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Framing(e) => write!(f, "{e}"),
            Self::Crypto(e) => write!(f, "{e}"),
            Self::Protocol(e) => write!(f, "{e}"),
            Self::Allocation(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Store(e) => write!(f, "credential store error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<FramingError> for ServerError {
    fn from(e: FramingError) -> Self {
        Self::Framing(e)
    }
}

impl From<CryptoError> for ServerError {
    fn from(e: CryptoError) -> Self {
        Self::Crypto(e)
    }
}

impl From<ProtocolError> for ServerError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<AllocationError> for ServerError {
    fn from(e: AllocationError) -> Self {
        Self::Allocation(e)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
