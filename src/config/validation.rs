use crate::config::types::{ClientConfig, Config, OutputConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Largest page size the search endpoint honors
const MAX_PER_PAGE: u32 = 30;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot have paths appended",
            config.base_url
        )));
    }

    if config.per_page < 1 || config.per_page > MAX_PER_PAGE {
        return Err(ConfigError::Validation(format!(
            "per-page must be between 1 and {}, got {}",
            MAX_PER_PAGE, config.per_page
        )));
    }

    if config.topics.is_empty() {
        return Err(ConfigError::Validation(
            "topics must list at least one topic".to_string(),
        ));
    }

    for topic in &config.topics {
        validate_topic(topic)?;
    }

    if config.max_consecutive_unavailable == Some(0) {
        return Err(ConfigError::Validation(
            "max-consecutive-unavailable must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates a topic slug
fn validate_topic(topic: &str) -> Result<(), ConfigError> {
    if topic.trim().is_empty() {
        return Err(ConfigError::Validation(
            "topic cannot be empty".to_string(),
        ));
    }

    if topic.contains('/') {
        return Err(ConfigError::Validation(format!(
            "topic '{}' cannot contain '/'",
            topic
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    if config.manifest_file.is_empty() {
        return Err(ConfigError::Validation(
            "manifest-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}
