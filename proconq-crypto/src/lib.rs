//! Cryptographic primitives for the proconq chat handshake.
//!
//! Provides:
//! - RSA-2048 with OAEP padding — asymmetric, server-owned, used once per session
//! - AES-256-CBC with PKCS#7 padding — symmetric, fresh cipher context per frame

#![deny(unsafe_code)]

mod asymmetric;
mod error;
mod symmetric;

pub use asymmetric::{KeyPair, PublicKey};
pub use error::CryptoError;
pub use symmetric::Cipher;
