//! Result processing: turns one page of raw results into records
//!
//! Entries are examined in page order. The first failing check decides the
//! skip reason:
//!
//! 1. element is not a result object → `Malformed`
//! 2. `plus` is truthy → `Plus`
//! 3. caption missing or empty → `MissingCaption`
//! 4. `urls.full` missing or empty → `MissingImageUrl`
//! 5. image download or decode fails → `ImageUnavailable`
//!
//! Images are only requested when the consumer pulls the next item, so a
//! processor that is dropped half-way never downloads the rest of its page.

use crate::record::{RawEntry, RawResult, Record};
use crate::search::source::ImageSource;
use crate::state::SkipReason;
use futures::Stream;
use std::sync::Arc;

/// What happened to one raw entry
#[derive(Debug)]
pub enum Processed {
    /// The entry became a record
    Record(Record),

    /// The entry was dropped
    Skipped {
        id: Option<String>,
        reason: SkipReason,
    },
}

/// Pull-based processor over one page of results
///
/// Single pass: once exhausted it stays exhausted.
pub struct PageProcessor {
    topic: String,
    entries: std::vec::IntoIter<RawEntry>,
    images: Arc<dyn ImageSource>,
}

impl PageProcessor {
    pub fn new(topic: impl Into<String>, entries: Vec<RawEntry>, images: Arc<dyn ImageSource>) -> Self {
        Self {
            topic: topic.into(),
            entries: entries.into_iter(),
            images,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Number of entries not yet examined
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// Examines the next entry, or returns `None` once the page is consumed
    pub async fn next_outcome(&mut self) -> Option<Processed> {
        let entry = self.entries.next()?;

        let result = match entry {
            RawEntry::Result(result) => result,
            RawEntry::Malformed(_) => {
                return Some(Processed::Skipped {
                    id: None,
                    reason: SkipReason::Malformed,
                })
            }
        };

        let id = result.photo_id().map(str::to_string);

        let (text, image_url) = match check_eligibility(&result) {
            Ok(fields) => fields,
            Err(reason) => return Some(Processed::Skipped { id, reason }),
        };

        let image = match self.images.fetch_image(image_url).await.into_result() {
            Ok(image) => image,
            Err(failure) => {
                return Some(Processed::Skipped {
                    id,
                    reason: SkipReason::ImageUnavailable(failure),
                })
            }
        };

        Some(Processed::Record(Record {
            id,
            image,
            text: text.to_string(),
            topic: self.topic.clone(),
            image_url: image_url.to_string(),
        }))
    }

    /// Returns the next record, silently passing over skipped entries
    pub async fn next_record(&mut self) -> Option<Record> {
        loop {
            match self.next_outcome().await? {
                Processed::Record(record) => return Some(record),
                Processed::Skipped { id, reason } => {
                    tracing::debug!(topic = %self.topic, id = ?id, %reason, "Skipping result");
                }
            }
        }
    }

    /// Converts the processor into a lazy stream of records
    pub fn into_stream(self) -> impl Stream<Item = Record> + Send {
        futures::stream::unfold(self, |mut processor| async move {
            processor
                .next_record()
                .await
                .map(|record| (record, processor))
        })
    }
}

/// Applies the metadata filters, returning the caption and image URL of an eligible result
pub fn check_eligibility(result: &RawResult) -> Result<(&str, &str), SkipReason> {
    if result.is_plus() {
        return Err(SkipReason::Plus);
    }

    let text = result.caption().ok_or(SkipReason::MissingCaption)?;
    let image_url = result.full_image_url().ok_or(SkipReason::MissingImageUrl)?;

    Ok((text, image_url))
}

/// Lazily processes one page of results for `topic`
pub fn process(
    topic: impl Into<String>,
    entries: Vec<RawEntry>,
    images: Arc<dyn ImageSource>,
) -> impl Stream<Item = Record> + Send {
    PageProcessor::new(topic, entries, images).into_stream()
}
