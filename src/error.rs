//! Global error handling for shelfview
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project, plus the per-component fetch and storage
//! errors that callers handle locally.

use std::io;

use thiserror::Error;

/// Error from fetching a shelf listing or file
///
/// Every variant carries the shelf path the request was issued for, so a
/// failure can be rendered in place of the listing it was meant to produce.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, read)
    #[error("request for '{path}' failed: {source}")]
    Transport {
        /// Shelf path the request was issued for
        path: String,
        /// Underlying transport error
        source: reqwest::Error,
    },

    /// The host answered with a non-success status
    #[error("request for '{path}' returned status {status}")]
    Status {
        /// Shelf path the request was issued for
        path: String,
        /// HTTP status returned by the host
        status: reqwest::StatusCode,
    },

    /// The listing body was not a valid descriptor array
    #[error("listing for '{path}' is not a valid descriptor: {source}")]
    Decode {
        /// Shelf path the request was issued for
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Shelf path the failed request was issued for
    pub fn path(&self) -> &str {
        match self {
            Self::Transport { path, .. } | Self::Status { path, .. } | Self::Decode { path, .. } => {
                path
            }
        }
    }
}

/// Error from the preferences store
#[derive(Error, Debug)]
pub enum StorageError {
    /// No per-user data directory could be determined
    #[error("could not determine a data directory")]
    NoDataDir,

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Global error type for shelfview operations
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Fetch-related errors
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Preference storage errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for shelfview operations
pub type Result<T> = std::result::Result<T, ShelfError>;
