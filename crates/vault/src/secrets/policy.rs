//! Pre-encryption validation rules for secret values, keyed by key name.

use std::ops::RangeInclusive;

use common::ServiceError;

/// Minimum length, in characters, of any bearer or provider secret.
pub const MIN_SECRET_LEN: usize = 20;

/// Allowed length, in characters, of a non-empty identifier value.
pub const IDENTIFIER_LEN: RangeInclusive<usize> = 11..=30;

/// Key names whose values must carry a provider prefix.
const PROVIDER_PREFIXES: &[(&str, &str)] = &[("openai_key", "sk-")];

/// Suffix marking an identifier-style key (`voice_id`, `elevenlabs_voice_id`, ...).
const IDENTIFIER_SUFFIX: &str = "voice_id";

/// The validation category a key name falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCategory {
    /// Any other key: an opaque bearer secret.
    Bearer,
    /// A provider secret that must start with `prefix`.
    Provider { prefix: &'static str },
    /// An optional identifier; empty is allowed.
    Identifier,
}

impl KeyCategory {
    /// Classify `key_name`.
    pub fn classify(key_name: &str) -> Self {
        if is_identifier_key(key_name) {
            return KeyCategory::Identifier;
        }
        PROVIDER_PREFIXES
            .iter()
            .find(|&&(name, _)| name == key_name)
            .map(|&(_, prefix)| KeyCategory::Provider { prefix })
            .unwrap_or(KeyCategory::Bearer)
    }
}

fn is_identifier_key(key_name: &str) -> bool {
    match key_name.strip_suffix(IDENTIFIER_SUFFIX) {
        Some(head) => head.is_empty() || head.ends_with('_'),
        None => false,
    }
}

/// Check `value` against the rule for `key_name`'s category.
///
/// Lengths count Unicode scalar values, not UTF-16 code units: a value with
/// characters outside the BMP (emoji) is shorter here than in a JavaScript
/// `.length` check.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] describing the first rule violated.
pub fn validate(key_name: &str, value: &str) -> Result<(), ServiceError> {
    let len = value.chars().count();
    match KeyCategory::classify(key_name) {
        KeyCategory::Identifier => {
            if value.is_empty() {
                return Ok(());
            }
            if !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(ServiceError::validation(
                    key_name,
                    "contains invalid characters (allowed: alphanumeric, underscore, hyphen)",
                ));
            }
            if !IDENTIFIER_LEN.contains(&len) {
                return Err(ServiceError::validation(
                    key_name,
                    format!(
                        "must be between {}-{} characters",
                        IDENTIFIER_LEN.start(),
                        IDENTIFIER_LEN.end()
                    ),
                ));
            }
        }
        KeyCategory::Bearer => ensure_min_len(key_name, len)?,
        KeyCategory::Provider { prefix } => {
            ensure_min_len(key_name, len)?;
            if !value.starts_with(prefix) {
                return Err(ServiceError::validation(
                    key_name,
                    format!("must start with {prefix}"),
                ));
            }
        }
    }
    Ok(())
}

fn ensure_min_len(key_name: &str, len: usize) -> Result<(), ServiceError> {
    if len < MIN_SECRET_LEN {
        return Err(ServiceError::validation(
            key_name,
            format!("must be at least {MIN_SECRET_LEN} characters"),
        ));
    }
    Ok(())
}
