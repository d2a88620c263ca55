//! Per-owner named secrets, encrypted and bound to their owner.
//!
//! # Lifecycle
//!
//! 1. [`SecretStore::save`] validates the raw value against its key's
//!    [`policy`], seals it together with the owner id, and upserts the row.
//! 2. [`SecretStore::get`] / [`SecretStore::get_all`] open the envelope and
//!    check the embedded owner id against the caller's.
//! 3. [`SecretStore::status`] reports presence from the row alone.
//!
//! # Security invariants
//!
//! - A caller cannot tell "not configured" from "corrupted" from "belongs to
//!   someone else": all three read as absent.
//! - Plaintext secrets are **never** logged.
//! - Validation runs before encryption; a rejected value never reaches the
//!   store.

pub mod policy;
pub mod repository;

pub use policy::KeyCategory;
pub use repository::{MemoryRepository, SecretRepository, StoreError, StoredSecret};

use std::collections::BTreeMap;

use chrono::Utc;
use common::{SecretPayload, ServiceError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::crypto::{CipherError, EnvelopeCipher};

/// Why a stored secret could not be handed back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretReadError {
    /// The envelope failed to parse, verify, or decode.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The payload was sealed for a different owner.
    #[error("owner mismatch")]
    OwnershipMismatch,
}

/// Encrypted `(owner_id, key_name) → secret` map over a [`SecretRepository`].
#[derive(Clone, Debug)]
pub struct SecretStore<R> {
    cipher: EnvelopeCipher,
    repo: R,
}

impl<R: SecretRepository> SecretStore<R> {
    /// Create a store that seals values with `cipher` and persists via `repo`.
    pub fn new(cipher: EnvelopeCipher, repo: R) -> Self {
        Self { cipher, repo }
    }

    /// Borrow the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validate, encrypt, and upsert a secret, replacing any previous value.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] if `raw_value` fails the key's rule.
    /// - [`ServiceError::EncryptionFailed`] if sealing fails.
    /// - [`ServiceError::Store`] if the repository rejects the write.
    pub async fn save(
        &self,
        owner_id: &str,
        key_name: &str,
        raw_value: &str,
    ) -> Result<(), ServiceError> {
        policy::validate(key_name, raw_value)?;

        let payload = SecretPayload::new(owner_id, raw_value);
        let value = self.cipher.encrypt(&payload).map_err(|e| {
            warn!(key = %key_name, error = %e, "secret encryption failed");
            ServiceError::EncryptionFailed {
                target: key_name.to_owned(),
            }
        })?;

        let now = Utc::now();
        self.repo
            .upsert(StoredSecret {
                owner_id: owner_id.to_owned(),
                key_name: key_name.to_owned(),
                value,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|e| ServiceError::Store(e.to_string()))?;

        debug!(key = %key_name, "secret saved");
        Ok(())
    }

    /// Fetch and decrypt one secret.
    ///
    /// Returns `None` when the key is not configured, when the store call
    /// fails, when the envelope cannot be opened, or when it belongs to
    /// another owner.
    pub async fn get(&self, owner_id: &str, key_name: &str) -> Option<String> {
        let row = match self.repo.fetch(owner_id, key_name).await {
            Ok(row) => row?,
            Err(e) => {
                warn!(key = %key_name, error = %e, "secret lookup failed; treating as not configured");
                return None;
            }
        };
        self.open_logged(owner_id, &row)
    }

    /// Fetch and decrypt every secret of `owner_id`.
    ///
    /// Entries that cannot be opened or belong to another owner are omitted.
    pub async fn get_all(&self, owner_id: &str) -> BTreeMap<String, String> {
        let rows = match self.repo.fetch_all(owner_id).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "secret listing failed; returning no secrets");
                return BTreeMap::new();
            }
        };
        rows.iter()
            .filter_map(|row| {
                self.open_logged(owner_id, row)
                    .map(|secret| (row.key_name.clone(), secret))
            })
            .collect()
    }

    /// Report which key names are configured for `owner_id`.
    ///
    /// Derived from row presence only; nothing is decrypted.
    pub async fn status(&self, owner_id: &str) -> BTreeMap<String, bool> {
        match self.repo.list_keys(owner_id).await {
            Ok(keys) => keys.into_iter().map(|k| (k, true)).collect(),
            Err(e) => {
                warn!(error = %e, "secret status lookup failed; returning empty status");
                BTreeMap::new()
            }
        }
    }

    /// Remove a secret. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the repository rejects the delete.
    pub async fn delete(&self, owner_id: &str, key_name: &str) -> Result<(), ServiceError> {
        self.repo
            .remove(owner_id, key_name)
            .await
            .map_err(|e| ServiceError::Store(e.to_string()))?;
        debug!(key = %key_name, "secret deleted");
        Ok(())
    }

    /// Open `row` and check it belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretReadError`] describing why the row cannot be returned.
    pub fn open(&self, owner_id: &str, row: &StoredSecret) -> Result<String, SecretReadError> {
        let payload: SecretPayload = self.cipher.decrypt(&row.value)?;
        if !payload.is_owned_by(owner_id) {
            return Err(SecretReadError::OwnershipMismatch);
        }
        Ok(payload.secret)
    }

    fn open_logged(&self, owner_id: &str, row: &StoredSecret) -> Option<String> {
        match self.open(owner_id, row) {
            Ok(secret) => Some(secret),
            Err(e) => {
                warn!(key = %row.key_name, error = %e, "stored secret unreadable; treating as not configured");
                None
            }
        }
    }
}
