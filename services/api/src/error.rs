//! services/api/src/error.rs
//!
//! Defines the primary error type for the `api` binary. Handler-level
//! failures are mapped to HTTP statuses in the web layer; the core crate's
//! `GatewayError` and `StoreError` carry the domain error taxonomy.

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
