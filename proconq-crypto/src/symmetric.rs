//! AES-256-CBC with PKCS#7 padding.
//!
//! A fresh block-cipher context is instantiated for every frame — the key
//! and IV are plain data held by [`Cipher`], never a long-lived mutable
//! cipher object that gets re-seeded between calls.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::CryptoError;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// A symmetric session key + IV pair.
#[derive(Clone)]
pub struct Cipher {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl Cipher {
    /// Generate a fresh random key and IV.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Build from raw bytes received from a peer.
    pub fn from_parts(key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| CryptoError::InvalidKeyMaterial)?;
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| CryptoError::InvalidKeyMaterial)?;
        Ok(Self { key, iv })
    }

    /// Raw key bytes, for shipping to the peer during the handshake.
    pub fn key_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Raw IV bytes, for shipping to the peer during the handshake.
    pub fn iv_bytes(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Pad and encrypt `plaintext` with a fresh cipher context.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        Encryptor::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<cbc::cipher::block_padding::Pkcs7>(plaintext)
    }

    /// Decrypt and unpad `ciphertext` with a fresh cipher context.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Decryptor::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<cbc::cipher::block_padding::Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::InvalidPadding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cipher = Cipher::generate();
        let msg = b"#AESKEY#deadbeef###cafebabe";
        let ct = cipher.encrypt(msg);
        let pt = cipher.decrypt(&ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn corrupted_ciphertext_fails_unpad() {
        let cipher = Cipher::generate();
        let mut ct = cipher.encrypt(b"some longer message to pad across blocks");
        let last = ct.len() - 1;
        ct[last] ^= 0xff;
        assert!(cipher.decrypt(&ct).is_err());
    }

    #[test]
    fn from_parts_round_trips_key_and_iv() {
        let a = Cipher::generate();
        let b = Cipher::from_parts(a.key_bytes(), a.iv_bytes()).unwrap();
        let ct = a.encrypt(b"same key same iv");
        assert_eq!(b.decrypt(&ct).unwrap(), b"same key same iv");
    }
}
