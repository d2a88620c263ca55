//! Configuration loading and validation.
//!
//! All values are read from environment variables at startup. A missing or
//! malformed encryption key is fatal: callers should refuse to start rather
//! than run without protection.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{EncryptionKey, EnvelopeCipher};

/// Validated vault configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte AES key (64 hex characters). **Required.**
    pub encryption_key: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is not 64 hex characters.
    pub fn key(&self) -> Result<EncryptionKey> {
        EncryptionKey::from_hex(&self.encryption_key).context("ENCRYPTION_KEY is invalid")
    }

    /// Build the cipher shared by the field protector and secret store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key cannot be decoded.
    pub fn cipher(&self) -> Result<EnvelopeCipher> {
        Ok(EnvelopeCipher::new(&self.key()?))
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.encryption_key, "ENCRYPTION_KEY")?;
        self.key()?;
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
