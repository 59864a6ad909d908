//! Error types for repomark-core.
//!
//! This module defines the canonical error type for the library. Search
//! failures carry the HTTP status so the user-facing message can mirror
//! what the API reported; persistence errors exist so the storage adapter
//! can log and absorb them.

use std::path::PathBuf;

/// The main error type for repomark-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The search endpoint returned a non-success status.
    #[error("GitHub API error: {status} {status_text}")]
    SearchFailed {
        /// HTTP status code returned by the API.
        status: u16,
        /// Canonical reason phrase for the status, possibly empty.
        status_text: String,
    },

    /// A single repository lookup returned a non-success status.
    ///
    /// Batch callers treat this as not-found and drop the entry.
    #[error("repository lookup failed for id {id}: HTTP {status}")]
    LookupFailed {
        /// Repository id that was requested.
        id: u64,
        /// HTTP status code returned by the API.
        status: u16,
    },

    /// Transport-level HTTP failure (connection, TLS, body decoding).
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for repomark-core operations.
pub type Result<T> = std::result::Result<T, Error>;
