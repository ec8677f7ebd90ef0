//! Output sink traits and types
//!
//! This module defines the trait interface for record sinks and the
//! manifest line written for every stored record.

use crate::record::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to serialize manifest entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One line of the JSONL manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Position of the record in the output directory, starting at 0
    pub index: usize,

    pub id: Option<String>,
    pub text: String,
    pub topic: String,
    pub image_url: String,

    /// Image file name, relative to the output directory
    pub file: String,

    pub width: u32,
    pub height: u32,
    pub fetched_at: DateTime<Utc>,
}

impl ManifestEntry {
    /// Describes `record` stored under `file`
    pub fn new(index: usize, record: &Record, file: impl Into<String>) -> Self {
        Self {
            index,
            id: record.id.clone(),
            text: record.text.clone(),
            topic: record.topic.clone(),
            image_url: record.image_url.clone(),
            file: file.into(),
            width: record.image.width(),
            height: record.image.height(),
            fetched_at: Utc::now(),
        }
    }
}

/// Trait for record sinks
///
/// A sink receives records in the order the session yields them.
pub trait RecordSink {
    /// Stores one record under the sink's next index
    ///
    /// Returns the manifest entry describing where it was stored.
    fn write_record(&mut self, record: &Record) -> OutputResult<ManifestEntry>;

    /// Flushes anything buffered
    fn finish(&mut self) -> OutputResult<()>;
}
