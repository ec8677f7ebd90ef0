use crate::state::{SkipReason, Unavailability};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Running counters for one search session
///
/// A fresh session starts from zero; nothing here outlives the session that
/// owns it.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Wall-clock start of the session
    pub started_at: DateTime<Utc>,

    /// Page fetch attempts, successful or not
    pub pages_requested: u64,

    /// Page fetches that returned at least one entry
    pub pages_received: u64,

    /// Page fetches that produced nothing, by cause
    pub pages_unavailable: HashMap<Unavailability, u64>,

    /// Raw results seen by the processor
    pub results_seen: u64,

    /// Dropped results, by reason
    pub skipped: HashMap<SkipReason, u64>,

    /// Records handed to the consumer
    pub records_yielded: u64,

    /// Consecutive page fetches that produced nothing
    pub consecutive_unavailable: u32,

    start_instant: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            pages_requested: 0,
            pages_received: 0,
            pages_unavailable: HashMap::new(),
            results_seen: 0,
            skipped: HashMap::new(),
            records_yielded: 0,
            consecutive_unavailable: 0,
            start_instant: Instant::now(),
        }
    }

    pub fn record_page_request(&mut self) {
        self.pages_requested += 1;
    }

    pub fn record_page_received(&mut self, entries: usize) {
        self.pages_received += 1;
        self.results_seen += entries as u64;
        self.consecutive_unavailable = 0;
    }

    pub fn record_page_unavailable(&mut self, reason: Unavailability) {
        *self.pages_unavailable.entry(reason).or_insert(0) += 1;
        self.consecutive_unavailable = self.consecutive_unavailable.saturating_add(1);
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    pub fn record_yield(&mut self) {
        self.records_yielded += 1;
    }

    /// Total number of dropped results
    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Total number of page fetches that produced nothing
    pub fn total_unavailable(&self) -> u64 {
        self.pages_unavailable.values().sum()
    }

    /// Count for one skip reason
    pub fn skipped_for(&self, reason: SkipReason) -> u64 {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    /// Time since the session started
    pub fn elapsed(&self) -> Duration {
        self.start_instant.elapsed()
    }

    /// Records per second since the session started
    pub fn yield_rate(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.records_yielded as f64 / secs
    }

    /// Share of seen results that became records, as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.results_seen == 0 {
            return 0.0;
        }
        (self.records_yielded as f64 / self.results_seen as f64) * 100.0
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
