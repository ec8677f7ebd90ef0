//! HTTP fetcher implementation
//!
//! This module handles both kinds of outbound requests a session makes:
//! - GET of one page of topic search results (JSON)
//! - GET of one full-size image (binary, decoded in memory)
//!
//! Neither function returns an error. Every failure is classified into a
//! tagged outcome so callers can log and count it, then carry on.

use crate::config::ClientConfig;
use crate::record::{is_truthy, RawEntry};
use crate::state::{ImageFailure, Unavailability};
use image::DynamicImage;
use reqwest::{Client, IntoUrl};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Broad classification of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Connect,
    Other,
}

impl NetworkErrorKind {
    fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else {
            Self::Other
        }
    }
}

/// Result of fetching one page of search results
#[derive(Debug, Clone)]
pub enum PageFetch {
    /// The endpoint returned a non-empty JSON array
    Page(Vec<RawEntry>),

    /// The endpoint returned an empty or falsy JSON value
    Empty,

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Classification of the failure
        kind: NetworkErrorKind,
    },

    /// The body was not JSON, or was JSON of an unexpected shape
    ParseError {
        /// Error description
        error: String,
    },
}

impl PageFetch {
    /// Returns why this fetch produced nothing, or `None` for a usable page
    pub fn unavailability(&self) -> Option<Unavailability> {
        match self {
            Self::Page(entries) if !entries.is_empty() => None,
            Self::Page(_) | Self::Empty => Some(Unavailability::Empty),
            Self::HttpError { .. } => Some(Unavailability::HttpError),
            Self::NetworkError { .. } => Some(Unavailability::NetworkError),
            Self::ParseError { .. } => Some(Unavailability::ParseError),
        }
    }
}

/// Result of fetching and decoding one image
#[derive(Debug, Clone)]
pub enum ImageFetch {
    /// Successfully decoded bitmap
    Image(DynamicImage),

    /// Non-success HTTP status
    HttpError { status_code: u16 },

    /// Network error (connection refused, timeout, DNS failure, truncated body)
    NetworkError {
        error: String,
        kind: NetworkErrorKind,
    },

    /// The body was not a decodable image
    DecodeError { error: String },
}

impl ImageFetch {
    /// Returns the failure class, or `None` if an image was decoded
    pub fn failure(&self) -> Option<ImageFailure> {
        match self {
            Self::Image(_) => None,
            Self::HttpError { .. } => Some(ImageFailure::HttpError),
            Self::NetworkError { .. } => Some(ImageFailure::NetworkError),
            Self::DecodeError { .. } => Some(ImageFailure::DecodeError),
        }
    }

    /// Splits into the decoded image or its failure class
    pub fn into_result(self) -> Result<DynamicImage, ImageFailure> {
        match self {
            Self::Image(image) => Ok(image),
            Self::HttpError { .. } => Err(ImageFailure::HttpError),
            Self::NetworkError { .. } => Err(ImageFailure::NetworkError),
            Self::DecodeError { .. } => Err(ImageFailure::DecodeError),
        }
    }

    /// Converts into the decoded image, discarding failure detail
    pub fn into_image(self) -> Option<DynamicImage> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use unsplash_stream::config::ClientConfig;
/// use unsplash_stream::search::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the search URL for one topic page
///
/// `base` must be a URL that can have path segments appended; the page
/// number is 0-based.
pub fn page_url(base: &Url, topic: &str, cursor: u32, per_page: u32) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["topics", topic, "photos"]);
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("page", &cursor.to_string())
        .append_pair("per_page", &per_page.to_string());
    url
}

/// Fetches one page of search results
///
/// # Request Flow
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Transport failure | NetworkError |
/// | Non-2xx status | HttpError |
/// | Body not JSON | ParseError |
/// | Falsy JSON (`null`, `[]`, `{}`, ...) | Empty |
/// | Non-empty array | Page |
/// | Any other JSON | ParseError |
pub async fn fetch_page(client: &Client, url: Url) -> PageFetch {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return PageFetch::NetworkError {
                kind: NetworkErrorKind::classify(&e),
                error: e.to_string(),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return PageFetch::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.bytes().await {
        Ok(body) => parse_page(&body),
        Err(e) => PageFetch::NetworkError {
            kind: NetworkErrorKind::classify(&e),
            error: e.to_string(),
        },
    }
}

/// Interprets a search response body
pub fn parse_page(body: &[u8]) -> PageFetch {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            return PageFetch::ParseError {
                error: e.to_string(),
            }
        }
    };

    if !is_truthy(&value) {
        return PageFetch::Empty;
    }

    match value {
        Value::Array(items) => PageFetch::Page(items.into_iter().map(RawEntry::from_value).collect()),
        other => PageFetch::ParseError {
            error: format!("expected a JSON array, got {}", json_kind(&other)),
        },
    }
}

/// Fetches and decodes one image
pub async fn fetch_image(client: &Client, url: impl IntoUrl) -> ImageFetch {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return ImageFetch::NetworkError {
                kind: NetworkErrorKind::classify(&e),
                error: e.to_string(),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return ImageFetch::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.bytes().await {
        Ok(body) => decode_image(&body),
        Err(e) => ImageFetch::NetworkError {
            kind: NetworkErrorKind::classify(&e),
            error: e.to_string(),
        },
    }
}

/// Decodes an image from memory, guessing the format from its magic bytes
pub fn decode_image(bytes: &[u8]) -> ImageFetch {
    match image::load_from_memory(bytes) {
        Ok(image) => ImageFetch::Image(image),
        Err(e) => ImageFetch::DecodeError {
            error: e.to_string(),
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
