//! Error type shared by the asymmetric and symmetric primitives.

use std::fmt;

/// Errors from [`crate::KeyPair`] and [`crate::Cipher`] operations.
#[derive(Debug)]
pub enum CryptoError {
    /// The ciphertext's padding did not decode to a valid PKCS#7 block.
    InvalidPadding,
    /// Decryption failed for a reason other than padding (wrong key, truncated input).
    DecryptFailed,
    /// Key or IV material was the wrong length or otherwise malformed.
    InvalidKeyMaterial,
    /// The underlying `rsa` crate rejected the operation.
    Rsa(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPadding => write!(f, "invalid PKCS#7 padding"),
            Self::DecryptFailed => write!(f, "decryption failed"),
            Self::InvalidKeyMaterial => write!(f, "invalid key or IV material"),
            Self::Rsa(e) => write!(f, "RSA error: {e}"),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<rsa::Error> for CryptoError {
    fn from(e: rsa::Error) -> Self {
        Self::Rsa(e.to_string())
    }
}
