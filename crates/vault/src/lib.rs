//! Field-level authenticated encryption.
//!
//! Three layers, each depending only on the one below:
//!
//! - [`crypto`]: [`EnvelopeCipher`] seals any JSON payload into an
//!   `iv:tag:ciphertext` hex envelope with AES-256-GCM.
//! - [`protect`]: [`FieldProtector`] encrypts a configured subset of fields
//!   in a record, and reads them back with per-field failure isolation.
//! - [`secrets`]: [`SecretStore`] keeps per-owner named secrets, validated
//!   before encryption and bound to their owner.
//!
//! Startup sequence for an embedding service:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise logging with [`telemetry::init_telemetry`].
//! 3. Build one [`EnvelopeCipher`] via [`Config::cipher`] and hand clones of
//!    it to the [`FieldProtector`] and [`SecretStore`].

pub mod config;
pub mod crypto;
pub mod protect;
pub mod secrets;
pub mod telemetry;

pub use common::{FieldPayload, SecretPayload, ServiceError};
pub use config::Config;
pub use crypto::{CipherError, EncryptionKey, Envelope, EnvelopeCipher};
pub use protect::{FieldProtector, FieldReadError, Record};
pub use secrets::{MemoryRepository, SecretReadError, SecretRepository, SecretStore, StoredSecret};
