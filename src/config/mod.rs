//! Configuration module for Unsplash-Stream
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use unsplash_stream::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Will collect {} records", config.search.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, ExhaustionPolicy, OutputConfig, SearchConfig, DEFAULT_BASE_URL,
    DEFAULT_PER_PAGE,
};

// Re-export parser functions
pub use parser::{apply_overrides, compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
