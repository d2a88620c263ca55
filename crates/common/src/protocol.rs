//! Plaintext payloads wrapped inside an envelope before encryption.
//!
//! These types are serialised as camelCase JSON; the JSON text is what the
//! cipher encrypts. Each payload carries a binding tag (`field` or `ownerId`)
//! that the reader checks after decryption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field payload
// ---------------------------------------------------------------------------

/// Payload stored in a single protected record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    /// The original field value, any JSON shape.
    pub value: serde_json::Value,
    /// Name of the field this ciphertext was produced for.
    pub field: String,
    /// When the value was encrypted.
    pub encrypted_at: DateTime<Utc>,
}

impl FieldPayload {
    /// Wrap `value` for `field`, stamped with the current time.
    pub fn new(field: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            value,
            field: field.into(),
            encrypted_at: Utc::now(),
        }
    }

    /// Returns `true` if this payload was produced for `field`.
    pub fn is_for(&self, field: &str) -> bool {
        self.field == field
    }
}

// ---------------------------------------------------------------------------
// Secret payload
// ---------------------------------------------------------------------------

/// Payload stored for one named secret of one owner.
///
/// Rows written before the rename used `apiKey` / `userId`; both spellings
/// deserialise.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretPayload {
    /// The raw secret value.
    #[serde(alias = "apiKey")]
    pub secret: String,
    /// Owner the secret was saved for.
    #[serde(alias = "userId")]
    pub owner_id: String,
}

impl SecretPayload {
    /// Bind `secret` to `owner_id`.
    pub fn new(owner_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            owner_id: owner_id.into(),
        }
    }

    /// Returns `true` if this payload belongs to `owner_id`.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPayload")
            .field("secret", &"[REDACTED]")
            .field("owner_id", &self.owner_id)
            .finish()
    }
}
