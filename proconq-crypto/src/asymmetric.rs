//! RSA-2048/OAEP keypair used once per session to bootstrap a symmetric key.

use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::CryptoError;

const KEY_BITS: usize = 2048;

/// The server's asymmetric keypair.
///
/// Generated once at startup and held for the lifetime of the process; the
/// private half never leaves this struct.
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate a fresh 2048-bit keypair.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, KEY_BITS)?;
        let public = RsaPublicKey::from(&private);
        Ok(Self { private, public })
    }

    /// The public half, cheap to clone and hand to a client.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Decrypt a payload that was OAEP-encrypted under our public key.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let padding = Oaep::new::<Sha256>();
        self.private
            .decrypt(padding, ciphertext)
            .map_err(CryptoError::from)
    }
}

/// A public key in transit — what the server hands a connecting client.
#[derive(Clone)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Serialize to a printable form (PEM) that round-trips through [`Self::from_printable`].
    pub fn to_printable(&self) -> Result<String, CryptoError> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Rsa(e.to_string()))
    }

    /// Parse a key previously produced by [`Self::to_printable`].
    pub fn from_printable(pem: &str) -> Result<Self, CryptoError> {
        RsaPublicKey::from_public_key_pem(pem)
            .map(Self)
            .map_err(|e| CryptoError::Rsa(e.to_string()))
    }

    /// OAEP-encrypt a payload under this public key. Used only by a peer
    /// that holds the server's public key, never by the server itself.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut rng = rand::thread_rng();
        let padding = Oaep::new::<Sha256>();
        self.0
            .encrypt(&mut rng, padding, plaintext)
            .map_err(CryptoError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_public_key_pem() {
        let kp = KeyPair::generate().unwrap();
        let pem = kp.public_key().to_printable().unwrap();
        let restored = PublicKey::from_printable(&pem).unwrap();

        let msg = b"hybrid handshake payload";
        let ct = restored.encrypt(msg).unwrap();
        let pt = kp.decrypt(&ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn corrupted_ciphertext_fails_to_decrypt() {
        let kp = KeyPair::generate().unwrap();
        let mut ct = kp.public_key().encrypt(b"hello").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xff;
        assert!(kp.decrypt(&ct).is_err());
    }
}
