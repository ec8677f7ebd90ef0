//! Search module for polling topics and producing records
//!
//! This module contains the core polling logic, including:
//! - HTTP fetching of search pages and images
//! - Filtering raw results into records
//! - Per-topic cursors and random topic choice
//! - The session loop that deduplicates and enforces the record limit

mod client;
mod cursor;
mod fetcher;
mod processor;
mod session;
mod source;


pub use client::UnsplashClient;
pub use cursor::{CursorTable, TopicPicker};
pub use fetcher::{
    build_http_client, decode_image, fetch_image, fetch_page, page_url, parse_page, ImageFetch,
    NetworkErrorKind, PageFetch,
};
pub use processor::{check_eligibility, process, PageProcessor, Processed};
pub use session::{search, RecordStream, SearchRequest, SearchSession};
pub use source::{ImageSource, PageSource};
