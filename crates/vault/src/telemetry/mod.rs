//! Structured logging setup, with optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, envelopes, or key material** may appear in any span
//!   attribute or log field. Degraded reads log the field or key name and
//!   the error kind only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
