//! Topic search session - the main polling loop
//!
//! A session repeatedly:
//! 1. Picks a topic uniformly at random
//! 2. Claims that topic's next page cursor and fetches the page
//! 3. Runs the page through the processor, one entry per pull
//! 4. Drops records whose id was already yielded
//! 5. Hands the rest to the consumer until `limit` records have been produced
//!
//! Cursor table, seen ids and counters are owned by the session and die
//! with it. There is no cap on fetch attempts: if the topics cannot supply
//! `limit` fresh records the session polls forever, unless the caller opts
//! into `max_consecutive_unavailable`.

use crate::config::{ExhaustionPolicy, SearchConfig};
use crate::record::Record;
use crate::search::client::UnsplashClient;
use crate::search::cursor::{CursorTable, TopicPicker};
use crate::search::fetcher::PageFetch;
use crate::search::processor::{PageProcessor, Processed};
use crate::search::source::{ImageSource, PageSource};
use crate::state::{EventSender, SessionEvent, SessionStats, SkipReason, Unavailability};
use crate::StreamError;
use futures::Stream;
use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Boxed stream of records, as produced by a session
pub type RecordStream = Pin<Box<dyn Stream<Item = Record> + Send>>;

/// Validated parameters of a search session
#[derive(Debug, Clone)]
pub struct SearchRequest {
    topics: Vec<String>,
    limit: usize,
    exhaustion_policy: ExhaustionPolicy,
    max_consecutive_unavailable: Option<u32>,
    seed: Option<u64>,
}

impl SearchRequest {
    /// Creates a request over `topics` producing `limit` records
    ///
    /// # Returns
    ///
    /// * `Ok(SearchRequest)` - The request is usable
    /// * `Err(StreamError::InvalidRequest)` - No topics, or a blank topic
    pub fn new(topics: Vec<String>, limit: usize) -> Result<Self, StreamError> {
        if topics.is_empty() {
            return Err(StreamError::InvalidRequest(
                "at least one topic is required".to_string(),
            ));
        }

        if let Some(blank) = topics.iter().find(|topic| topic.trim().is_empty()) {
            return Err(StreamError::InvalidRequest(format!(
                "topic {:?} is blank",
                blank
            )));
        }

        Ok(Self {
            topics,
            limit,
            exhaustion_policy: ExhaustionPolicy::default(),
            max_consecutive_unavailable: None,
            seed: None,
        })
    }

    /// Creates a request bound to a single topic
    pub fn single(topic: impl Into<String>, limit: usize) -> Result<Self, StreamError> {
        Self::new(vec![topic.into()], limit)
    }

    /// Creates a request from the `[search]` configuration section
    pub fn from_config(config: &SearchConfig) -> Result<Self, StreamError> {
        Ok(Self::new(config.topics.clone(), config.limit)?
            .with_exhaustion_policy(config.on_exhausted)
            .with_max_consecutive_unavailable(config.max_consecutive_unavailable))
    }

    pub fn with_exhaustion_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.exhaustion_policy = policy;
        self
    }

    /// Ends the session after this many consecutive unavailable pages
    pub fn with_max_consecutive_unavailable(mut self, max: Option<u32>) -> Self {
        self.max_consecutive_unavailable = max;
        self
    }

    /// Fixes the topic-choice seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn exhaustion_policy(&self) -> ExhaustionPolicy {
        self.exhaustion_policy
    }
}

/// One search session: a pull-based source of deduplicated records
pub struct SearchSession {
    request: SearchRequest,
    pages: Arc<dyn PageSource>,
    images: Arc<dyn ImageSource>,
    cursors: CursorTable,
    picker: TopicPicker,
    seen_ids: HashSet<String>,
    current: Option<PageProcessor>,
    produced: usize,
    stats: SessionStats,
    events: EventSender,
    finished: bool,
}

impl SearchSession {
    /// Creates a new session; nothing is fetched until the first pull
    pub fn new(
        request: SearchRequest,
        pages: Arc<dyn PageSource>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        let picker = match request.seed {
            Some(seed) => TopicPicker::with_seed(request.topics.clone(), seed),
            None => TopicPicker::new(request.topics.clone()),
        };

        tracing::info!(
            "Starting search session: {} topic(s), limit {}",
            request.topics.len(),
            request.limit
        );

        Self {
            cursors: CursorTable::new(&request.topics),
            picker,
            request,
            pages,
            images,
            seen_ids: HashSet::new(),
            current: None,
            produced: 0,
            stats: SessionStats::new(),
            events: EventSender::disabled(),
            finished: false,
        }
    }

    /// Creates a session that fetches pages and images with one client
    pub fn with_client(request: SearchRequest, client: Arc<UnsplashClient>) -> Self {
        Self::new(request, client.clone(), client)
    }

    /// Attaches a diagnostic channel receiving every session event
    pub fn with_events(mut self, sender: UnboundedSender<SessionEvent>) -> Self {
        self.events = EventSender::new(sender);
        self
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Records yielded so far
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Returns true once the session will not yield anything else
    pub fn is_finished(&self) -> bool {
        self.finished || self.produced >= self.request.limit
    }

    /// The page `topic` will fetch next
    pub fn cursor(&self, topic: &str) -> Option<u32> {
        self.cursors.get(topic)
    }

    /// Returns true if `id` was already yielded in this session
    pub fn has_seen(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    /// Pulls the next record
    ///
    /// Suspends only on page and image fetches. Returns `None` once `limit`
    /// records were produced, or once the optional unavailable-page cap trips.
    pub async fn next_record(&mut self) -> Option<Record> {
        loop {
            if self.is_finished() {
                if !self.finished {
                    self.finish("limit reached");
                }
                return None;
            }

            let Some(processor) = self.current.as_mut() else {
                self.fetch_next_page().await;
                continue;
            };

            let topic = processor.topic().to_string();
            match processor.next_outcome().await {
                Some(Processed::Record(record)) => {
                    if let Some(record) = self.admit(record) {
                        return Some(record);
                    }
                }
                Some(Processed::Skipped { id, reason }) => self.note_skip(&topic, id, reason),
                None => self.current = None,
            }
        }
    }

    /// Converts the session into a lazy stream of records
    pub fn into_stream(self) -> RecordStream {
        Box::pin(futures::stream::unfold(self, |mut session| async move {
            session.next_record().await.map(|record| (record, session))
        }))
    }

    /// Fetches a page for a randomly chosen topic and installs its processor
    async fn fetch_next_page(&mut self) {
        let Some(topic) = self.picker.pick().map(str::to_string) else {
            self.finish("no topics to search");
            return;
        };

        let cursor = self.cursors.advance(&topic);
        self.stats.record_page_request();
        tracing::debug!(%topic, cursor, "Fetching page");

        let reason = match self.pages.fetch_page(&topic, cursor).await {
            PageFetch::Page(entries) if !entries.is_empty() => {
                tracing::debug!(%topic, cursor, entries = entries.len(), "Received page");
                self.stats.record_page_received(entries.len());
                self.events.emit(SessionEvent::PageFetched {
                    topic: topic.clone(),
                    cursor,
                    entries: entries.len(),
                });
                self.current = Some(PageProcessor::new(topic, entries, self.images.clone()));
                return;
            }
            PageFetch::Page(_) | PageFetch::Empty => {
                tracing::debug!(%topic, cursor, "Topic returned no results");
                Unavailability::Empty
            }
            PageFetch::HttpError { status_code } => {
                tracing::warn!(%topic, cursor, status_code, "Search request failed");
                Unavailability::HttpError
            }
            PageFetch::NetworkError { error, kind } => {
                tracing::warn!(%topic, cursor, ?kind, %error, "Search request failed");
                Unavailability::NetworkError
            }
            PageFetch::ParseError { error } => {
                tracing::warn!(%topic, cursor, %error, "Search response could not be parsed");
                Unavailability::ParseError
            }
        };

        self.stats.record_page_unavailable(reason);
        self.cursors
            .on_unavailable(&topic, self.request.exhaustion_policy);
        self.events.emit(SessionEvent::PageUnavailable {
            topic,
            cursor,
            reason,
        });

        if let Some(max) = self.request.max_consecutive_unavailable {
            if self.stats.consecutive_unavailable >= max {
                tracing::warn!(
                    "Giving up after {} consecutive unavailable pages",
                    self.stats.consecutive_unavailable
                );
                self.finish("too many unavailable pages");
            }
        }
    }

    /// Deduplicates a processed record, returning it if it may be yielded
    fn admit(&mut self, record: Record) -> Option<Record> {
        if let Some(id) = &record.id {
            if !self.seen_ids.insert(id.clone()) {
                let topic = record.topic.clone();
                self.note_skip(&topic, record.id, SkipReason::Duplicate);
                return None;
            }
        }

        self.produced += 1;
        self.stats.record_yield();
        self.events.emit(SessionEvent::Yielded {
            topic: record.topic.clone(),
            id: record.id.clone(),
            count: self.produced,
        });

        if self.produced % 10 == 0 {
            tracing::info!(
                "Progress: {} / {} records, {} pages requested, {:.2} records/sec",
                self.produced,
                self.request.limit,
                self.stats.pages_requested,
                self.stats.yield_rate()
            );
        }

        Some(record)
    }

    fn note_skip(&mut self, topic: &str, id: Option<String>, reason: SkipReason) {
        tracing::debug!(%topic, id = ?id, %reason, "Skipping result");
        self.stats.record_skip(reason);
        self.events.emit(SessionEvent::Skipped {
            topic: topic.to_string(),
            id,
            reason,
        });
    }

    fn finish(&mut self, why: &str) {
        self.finished = true;
        self.current = None;
        tracing::info!(
            "Search session finished ({}): {} records from {} pages in {:?}",
            why,
            self.produced,
            self.stats.pages_requested,
            self.stats.elapsed()
        );
    }
}

/// Searches `topics` and lazily yields up to `limit` deduplicated records
pub fn search(
    request: SearchRequest,
    pages: Arc<dyn PageSource>,
    images: Arc<dyn ImageSource>,
) -> RecordStream {
    SearchSession::new(request, pages, images).into_stream()
}
