//! Dataset adapter: restartable record streams
//!
//! Downstream pipelines iterate a dataset by asking it for a fresh stream
//! each pass. `IterableDataset` keeps only the generator; every call to
//! [`IterableDataset::stream`] builds a brand-new search session, so no
//! cursor or seen id leaks from one pass into the next.
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use std::sync::Arc;
//! use unsplash_stream::{unsplash_dataset, UnsplashClient};
//!
//! # async fn run() -> unsplash_stream::Result<()> {
//! let client = Arc::new(UnsplashClient::with_base_url("https://unsplash.com/napi")?);
//! let dataset = unsplash_dataset(client, "nature", 32)?;
//!
//! let mut records = dataset.stream();
//! while let Some(record) = records.next().await {
//!     println!("{}: {}", record.topic, record.text);
//! }
//! # Ok(())
//! # }
//! ```

use crate::record::Record;
use crate::search::{ImageSource, PageSource, RecordStream, SearchRequest, SearchSession, UnsplashClient};
use crate::StreamError;
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// A dataset built from a zero-argument generator of record streams
pub struct IterableDataset<F> {
    generator: F,
}

impl<F, S> IterableDataset<F>
where
    F: Fn() -> S,
    S: Stream<Item = Record>,
{
    pub fn from_generator(generator: F) -> Self {
        Self { generator }
    }

    /// Starts a new pass over the dataset
    pub fn stream(&self) -> S {
        (self.generator)()
    }

    /// Runs one full pass and collects every record
    pub async fn take_all(&self) -> Vec<Record> {
        self.stream().collect().await
    }
}

/// A dataset drawing from one or more topics through the given sources
pub fn topic_dataset(
    request: SearchRequest,
    pages: Arc<dyn PageSource>,
    images: Arc<dyn ImageSource>,
) -> IterableDataset<impl Fn() -> RecordStream + Send + Sync> {
    IterableDataset::from_generator(move || {
        SearchSession::new(request.clone(), pages.clone(), images.clone()).into_stream()
    })
}

/// A dataset of up to `limit` records for a single Unsplash topic
///
/// # Returns
///
/// * `Ok(IterableDataset)` - Ready to stream; nothing has been fetched yet
/// * `Err(StreamError::InvalidRequest)` - The topic is blank
pub fn unsplash_dataset(
    client: Arc<UnsplashClient>,
    topic: &str,
    limit: usize,
) -> Result<IterableDataset<impl Fn() -> RecordStream + Send + Sync>, StreamError> {
    let request = SearchRequest::single(topic, limit)?;
    Ok(topic_dataset(request, client.clone(), client))
}
