//! AES-256-GCM envelope encryption primitives.
//!
//! This module is intentionally free of record-store and logging concerns.
//! It provides the encrypt/decrypt operations used by the field and secret
//! layers.
//!
//! # Envelope format
//!
//! ```text
//! hex(iv[16]):hex(tag[16]):hex(ciphertext)
//! ```
//!
//! The ciphertext is the encrypted UTF-8 JSON of the payload.

pub mod cipher;
pub mod envelope;
pub mod key;

pub use cipher::{CipherError, EnvelopeCipher};
pub use envelope::Envelope;
pub use key::{EncryptionKey, KeyError, KEY_LEN};
