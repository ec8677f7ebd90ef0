//! Per-topic page cursors and topic selection
//!
//! This module handles:
//! - The cursor table (next page index per topic, starting at 0)
//! - Uniform random topic choice for each fetch
//! - Cursor handling when a topic's page comes back empty

use crate::config::ExhaustionPolicy;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Mapping from topic to the page index it will fetch next
#[derive(Debug, Clone, Default)]
pub struct CursorTable {
    cursors: HashMap<String, u32>,
}

impl CursorTable {
    /// Creates a table with every topic at page 0
    pub fn new(topics: &[String]) -> Self {
        Self {
            cursors: topics.iter().map(|topic| (topic.clone(), 0)).collect(),
        }
    }

    /// Returns the page a topic will fetch next
    pub fn get(&self, topic: &str) -> Option<u32> {
        self.cursors.get(topic).copied()
    }

    /// Claims the next page of `topic` and moves its cursor forward
    ///
    /// Returns the page index to fetch (the value before the increment).
    /// Topics not yet in the table start at 0.
    pub fn advance(&mut self, topic: &str) -> u32 {
        let cursor = self.cursors.entry(topic.to_string()).or_insert(0);
        let current = *cursor;
        *cursor = cursor.saturating_add(1);
        current
    }

    /// Rewinds a topic to page 0
    pub fn reset(&mut self, topic: &str) {
        if let Some(cursor) = self.cursors.get_mut(topic) {
            *cursor = 0;
        }
    }

    /// Applies the exhaustion policy after a page of `topic` produced nothing
    pub fn on_unavailable(&mut self, topic: &str, policy: ExhaustionPolicy) {
        match policy {
            ExhaustionPolicy::Reset => self.reset(topic),
            ExhaustionPolicy::Advance => {}
        }
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

/// Picks topics uniformly at random
///
/// Each pick is independent of cursor depth and of how productive a topic
/// has been so far.
#[derive(Debug, Clone)]
pub struct TopicPicker {
    topics: Vec<String>,
    rng: StdRng,
}

impl TopicPicker {
    /// Creates a picker seeded from the operating system
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a picker with a fixed seed, for reproducible topic order
    pub fn with_seed(topics: Vec<String>, seed: u64) -> Self {
        Self {
            topics,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks the next topic, or `None` if there are no topics
    pub fn pick(&mut self) -> Option<&str> {
        self.topics.choose(&mut self.rng).map(String::as_str)
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}
