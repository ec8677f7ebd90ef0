use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use unsplash_stream::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Topics: {:?}", config.search.topics);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a dataset can be traced back to the exact settings
/// that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Replaces the configured topics and/or limit, then validates the result
///
/// An empty `topics` slice keeps the configured topics. Overrides go
/// through the same checks as the file, so a topic the file could not
/// contain is rejected here too.
pub fn apply_overrides(
    config: &mut Config,
    topics: &[String],
    limit: Option<usize>,
) -> Result<(), ConfigError> {
    if !topics.is_empty() {
        config.search.topics = topics.to_vec();
    }

    if let Some(limit) = limit {
        config.search.limit = limit;
    }

    validate(config)
}
