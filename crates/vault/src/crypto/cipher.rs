//! AES-256-GCM encryption and decryption of whole JSON payloads.
//!
//! The IV is 16 bytes, not the usual 12, because that is what the stored
//! envelopes already use. AES-GCM accepts any IV length by running it
//! through GHASH to form the initial counter block; the `aes-gcm` crate
//! exposes this via the `NonceSize` type parameter.
//!
//! A fresh random IV is drawn from the OS CSPRNG on every call. IV reuse
//! under one key breaks both confidentiality and authentication.

use std::sync::Arc;

use aes_gcm::{
    aead::{consts::U16, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Key, Nonce, Tag,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::envelope::{Envelope, IV_LEN, TAG_LEN};
use super::key::EncryptionKey;

/// AES-256-GCM with a 16-byte IV and 16-byte tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// The envelope is not three hex segments, or a segment has the wrong size.
    #[error("invalid envelope format")]
    Format,

    /// Tag verification failed: tampered data, wrong key, or corruption.
    #[error("envelope failed integrity verification")]
    Integrity,

    /// The plaintext verified but is not JSON of the expected shape.
    #[error("decrypted payload could not be decoded")]
    Decode,

    /// Serialisation or the AEAD seal step failed.
    #[error("encryption failed")]
    Encrypt,
}

/// Authenticated encryption of JSON payloads into envelope strings.
///
/// Holds only the expanded key schedule. Cloning is cheap and every method
/// takes `&self`, so one instance can be shared freely across threads.
#[derive(Clone)]
pub struct EnvelopeCipher {
    aead: Arc<Aes256Gcm16>,
}

impl EnvelopeCipher {
    /// Build a cipher around `key`.
    pub fn new(key: &EncryptionKey) -> Self {
        let aead = Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key.as_bytes()));
        Self {
            aead: Arc::new(aead),
        }
    }

    /// Serialise `payload` to JSON and seal it into an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encrypt`] if the payload cannot be serialised
    /// or the AEAD refuses the input (unreachable for realistic sizes).
    pub fn encrypt<P: Serialize + ?Sized>(&self, payload: &P) -> Result<String, CipherError> {
        let mut buffer = serde_json::to_vec(payload).map_err(|_| CipherError::Encrypt)?;

        use aes_gcm::aead::rand_core::RngCore;
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let tag = self
            .aead
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CipherError::Encrypt)?;

        let mut envelope = Envelope {
            iv,
            tag: [0u8; TAG_LEN],
            ciphertext: buffer,
        };
        envelope.tag.copy_from_slice(&tag);
        Ok(envelope.to_string())
    }

    /// Open an envelope string and decode its JSON payload as `P`.
    ///
    /// No plaintext is returned unless the tag verifies.
    ///
    /// # Errors
    ///
    /// - [`CipherError::Format`] if the envelope is malformed.
    /// - [`CipherError::Integrity`] if tag verification fails.
    /// - [`CipherError::Decode`] if the plaintext is not valid JSON for `P`.
    pub fn decrypt<P: DeserializeOwned>(&self, envelope: &str) -> Result<P, CipherError> {
        let Envelope {
            iv,
            tag,
            mut ciphertext,
        } = Envelope::parse(envelope)?;

        self.aead
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&iv),
                b"",
                &mut ciphertext,
                Tag::<U16>::from_slice(&tag),
            )
            .map_err(|_| CipherError::Integrity)?;

        serde_json::from_slice(&ciphertext).map_err(|_| CipherError::Decode)
    }
}

impl std::fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EnvelopeCipher([REDACTED])")
    }
}
