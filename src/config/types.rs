use serde::{Deserialize, Serialize};

/// Default search API root
pub const DEFAULT_BASE_URL: &str = "https://unsplash.com/napi";

/// Default page size of the topic search endpoint
pub const DEFAULT_PER_PAGE: u32 = 16;

/// Main configuration structure for Unsplash-Stream
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(default)]
    pub client: ClientConfig,
    pub output: OutputConfig,
}

/// Search loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Root of the search API; topic paths are appended to it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Results requested per page
    #[serde(rename = "per-page", default = "default_per_page")]
    pub per_page: u32,

    /// Topics to draw from
    pub topics: Vec<String>,

    /// Number of records to produce
    pub limit: usize,

    /// What to do with a topic's cursor when its page comes back empty
    #[serde(rename = "on-exhausted", default)]
    pub on_exhausted: ExhaustionPolicy,

    /// Stop after this many consecutive unavailable pages (unbounded if unset)
    #[serde(rename = "max-consecutive-unavailable", default)]
    pub max_consecutive_unavailable: Option<u32>,
}

/// Cursor handling for a topic whose page fetch produced nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Rewind the topic to page 0 so it is polled again from the start
    #[default]
    Reset,

    /// Leave the cursor where it is; the topic keeps moving to later pages
    Advance,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving image files and the manifest
    pub directory: String,

    /// Manifest file name, relative to `directory`
    #[serde(rename = "manifest-file", default = "default_manifest_file")]
    pub manifest_file: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_user_agent() -> String {
    format!("unsplash-stream/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_manifest_file() -> String {
    "manifest.jsonl".to_string()
}
