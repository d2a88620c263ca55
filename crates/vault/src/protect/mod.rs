//! Selective encryption of named fields inside JSON records.
//!
//! # Module invariants
//!
//! - **Writes are all-or-nothing.** If any configured field fails to encrypt,
//!   [`FieldProtector::encrypt_fields`] returns an error and no partially
//!   protected record escapes.
//! - **Reads isolate failures.** A corrupted, tampered, or mis-tagged field
//!   becomes `null`; the rest of the record is still returned.
//! - **Legacy plaintext passes through.** A value without the envelope shape
//!   was written before protection existed and is returned unchanged.

pub mod history;

pub use history::HISTORY_FIELDS;

use std::sync::Arc;

use common::{FieldPayload, ServiceError};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::crypto::{CipherError, Envelope, EnvelopeCipher};

/// A structured record: top-level field name to JSON value.
pub type Record = Map<String, Value>;

/// Why a single protected field could not be read back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldReadError {
    /// The envelope failed to parse, verify, or decode.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The payload was sealed for a different field.
    #[error("field mismatch: expected {expected}, got {found}")]
    FieldMismatch { expected: String, found: String },
}

/// Encrypts and decrypts a fixed, ordered set of sensitive fields.
#[derive(Clone, Debug)]
pub struct FieldProtector {
    cipher: EnvelopeCipher,
    fields: Arc<[String]>,
}

impl FieldProtector {
    /// Create a protector for the given sensitive field names.
    pub fn new<I, S>(cipher: EnvelopeCipher, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cipher,
            fields: fields.into_iter().map(Into::<String>::into).collect(),
        }
    }

    /// The configured sensitive field names, in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns `true` if `value` is a string with the envelope shape.
    pub fn is_encrypted(value: &Value) -> bool {
        value.as_str().is_some_and(Envelope::looks_like)
    }

    /// Return a copy of `record` with every configured, non-null field
    /// replaced by an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::EncryptionFailed`] naming the first field that
    /// could not be encrypted. The whole call is aborted.
    pub fn encrypt_fields(&self, record: &Record) -> Result<Record, ServiceError> {
        let mut out = record.clone();
        for name in self.fields.iter() {
            let Some(value) = record.get(name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            let payload = FieldPayload::new(name.as_str(), value.clone());
            let envelope = self.cipher.encrypt(&payload).map_err(|e| {
                error!(field = %name, error = %e, "field encryption failed; aborting write");
                ServiceError::EncryptionFailed {
                    target: name.clone(),
                }
            })?;
            out.insert(name.clone(), Value::String(envelope));
        }
        Ok(out)
    }

    /// Return a copy of `record` with every configured field decrypted.
    ///
    /// Unreadable fields come back as `null`; legacy plaintext is kept.
    pub fn decrypt_fields(&self, record: &Record) -> Record {
        let mut out = record.clone();
        for name in self.fields.iter() {
            let Some(slot) = out.get_mut(name) else {
                continue;
            };
            if slot.is_null() {
                continue;
            }
            let stored = std::mem::take(slot);
            *slot = self.reveal(name, stored).unwrap_or(Value::Null);
        }
        out
    }

    /// Read back a single configured field from `record`.
    ///
    /// Returns `None` if the field is not configured, absent, `null`, or
    /// unreadable.
    pub fn decrypt_field(&self, record: &Record, name: &str) -> Option<Value> {
        if !self.fields.iter().any(|f| f == name) {
            return None;
        }
        match record.get(name) {
            None | Some(Value::Null) => None,
            Some(stored) => self.reveal(name, stored.clone()),
        }
    }

    /// Decrypt one envelope string that was sealed for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldReadError::Cipher`] if the envelope cannot be opened, or
    /// [`FieldReadError::FieldMismatch`] if it was sealed for another field.
    pub fn try_decrypt_field(&self, name: &str, envelope: &str) -> Result<Value, FieldReadError> {
        let payload: FieldPayload = self.cipher.decrypt(envelope)?;
        if !payload.is_for(name) {
            return Err(FieldReadError::FieldMismatch {
                expected: name.to_owned(),
                found: payload.field,
            });
        }
        Ok(payload.value)
    }

    /// Encrypt each record independently; results keep input order.
    pub fn encrypt_array(&self, records: &[Record]) -> Vec<Result<Record, ServiceError>> {
        records.iter().map(|r| self.encrypt_fields(r)).collect()
    }

    /// Decrypt each record independently; results keep input order.
    pub fn decrypt_array(&self, records: &[Record]) -> Vec<Record> {
        records.iter().map(|r| self.decrypt_fields(r)).collect()
    }

    /// Legacy passthrough or decrypt; `None` means the field must read as `null`.
    fn reveal(&self, name: &str, stored: Value) -> Option<Value> {
        let envelope = match stored.as_str() {
            Some(s) if Envelope::looks_like(s) => s,
            _ => return Some(stored),
        };
        match self.try_decrypt_field(name, envelope) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(field = %name, error = %e, "protected field unreadable; returning null");
                None
            }
        }
    }
}
