//! Shared payload types and errors for the vault crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
pub use protocol::{FieldPayload, SecretPayload};
