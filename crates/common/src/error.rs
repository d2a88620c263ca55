//! Common error types shared across crates.

use thiserror::Error;

/// Errors a write path hands back to its caller.
///
/// Read paths never produce these; they degrade to `null` / `None` instead.
/// Variants map to HTTP status codes for the handlers sitting in front:
/// - [`ServiceError::Validation`] → 400
/// - [`ServiceError::EncryptionFailed`] → 500
/// - [`ServiceError::Store`] → 503
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The value failed the pre-encryption check for its key name.
    #[error("invalid value for {key_name}: {reason}")]
    Validation { key_name: String, reason: String },

    /// A field or secret could not be encrypted; nothing was written.
    #[error("failed to encrypt {target}")]
    EncryptionFailed { target: String },

    /// The record store rejected or could not complete the write.
    #[error("record store unavailable: {0}")]
    Store(String),
}

impl ServiceError {
    /// Build a [`ServiceError::Validation`].
    pub fn validation(key_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::Validation {
            key_name: key_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Validation { .. } => 400,
            ServiceError::EncryptionFailed { .. } => 500,
            ServiceError::Store(_) => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::validation("openai_key", "too short").http_status(), 400);
        assert_eq!(
            ServiceError::EncryptionFailed {
                target: "segments".into()
            }
            .http_status(),
            500
        );
        assert_eq!(ServiceError::Store("timeout".into()).http_status(), 503);
    }

    #[test]
    fn display_includes_key_and_reason() {
        let e = ServiceError::validation("elevenlabs_voice_id", "contains invalid characters");
        let msg = e.to_string();
        assert!(msg.contains("elevenlabs_voice_id"));
        assert!(msg.contains("contains invalid characters"));
    }
}
