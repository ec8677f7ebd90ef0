use crate::config::{ClientConfig, SearchConfig, DEFAULT_PER_PAGE};
use crate::search::fetcher::{self, build_http_client, page_url, ImageFetch, PageFetch};
use crate::search::source::{ImageSource, PageSource};
use crate::{ConfigError, StreamError};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Client for the Unsplash topic search API and its image host
///
/// One `reqwest::Client` serves both kinds of requests. Cloning is cheap and
/// shares the connection pool.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: Client,
    base_url: Url,
    per_page: u32,
}

impl UnsplashClient {
    /// Creates a client from the `[client]` and `[search]` configuration sections
    pub fn new(client_config: &ClientConfig, search_config: &SearchConfig) -> Result<Self, StreamError> {
        let client = build_http_client(client_config)?;
        Ok(Self {
            client,
            base_url: parse_base_url(&search_config.base_url)?,
            per_page: search_config.per_page,
        })
    }

    /// Creates a client with default HTTP settings against `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, StreamError> {
        let client = build_http_client(&ClientConfig::default())?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Overrides the page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// The URL requested for page `cursor` of `topic`
    pub fn page_url(&self, topic: &str, cursor: u32) -> Url {
        page_url(&self.base_url, topic, cursor, self.per_page)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot have paths appended",
            base_url
        )));
    }

    Ok(url)
}

#[async_trait]
impl PageSource for UnsplashClient {
    async fn fetch_page(&self, topic: &str, cursor: u32) -> PageFetch {
        fetcher::fetch_page(&self.client, self.page_url(topic, cursor)).await
    }
}

#[async_trait]
impl ImageSource for UnsplashClient {
    async fn fetch_image(&self, url: &str) -> ImageFetch {
        fetcher::fetch_image(&self.client, url).await
    }
}
