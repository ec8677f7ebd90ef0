//! Unsplash-Stream: a lazily polled photo dataset
//!
//! This crate polls the Unsplash topic search API page by page, filters and
//! deduplicates the results, downloads the referenced images, and exposes the
//! outcome as a pull-based stream of labeled records (image + caption + topic + id).

pub mod config;
pub mod dataset;
pub mod output;
pub mod record;
pub mod search;
pub mod state;

use thiserror::Error;

/// Main error type for Unsplash-Stream operations
///
/// Fetch failures never surface here: page and image downloads report tagged
/// outcomes that the search loop turns into skips. These variants cover
/// construction-time misuse and the surfaces around the stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Unsplash-Stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{unsplash_dataset, IterableDataset};
pub use record::{RawEntry, RawResult, Record};
pub use search::{SearchRequest, SearchSession, UnsplashClient};
pub use state::{SessionEvent, SessionStats, SkipReason};
