//! Seams between the search loop and the network
//!
//! The loop only ever talks to these two traits, which lets tests drive it
//! with in-memory pages and images.

use crate::search::fetcher::{ImageFetch, PageFetch};
use async_trait::async_trait;

/// Supplies pages of raw search results
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches page `cursor` (0-based) of `topic`
    async fn fetch_page(&self, topic: &str, cursor: u32) -> PageFetch;
}

/// Supplies decoded images
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetches and decodes the image at `url`
    async fn fetch_image(&self, url: &str) -> ImageFetch;
}
