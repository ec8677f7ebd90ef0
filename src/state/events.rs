//! Diagnostic events emitted by a search session

use crate::state::{SkipReason, Unavailability};
use tokio::sync::mpsc::UnboundedSender;

/// A structured event describing what the search loop just did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A page was fetched and is about to be processed
    PageFetched {
        topic: String,
        cursor: u32,
        entries: usize,
    },

    /// A page fetch produced nothing
    PageUnavailable {
        topic: String,
        cursor: u32,
        reason: Unavailability,
    },

    /// A raw result was dropped
    Skipped {
        topic: String,
        id: Option<String>,
        reason: SkipReason,
    },

    /// A record was handed to the consumer
    Yielded {
        topic: String,
        id: Option<String>,
        count: usize,
    },
}

/// Optional sending half of the diagnostic channel
///
/// Sending never blocks and never fails the session; once the receiver is
/// dropped, events are discarded.
#[derive(Debug, Clone, Default)]
pub struct EventSender {
    inner: Option<UnboundedSender<SessionEvent>>,
}

impl EventSender {
    /// A sender that discards everything
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn new(sender: UnboundedSender<SessionEvent>) -> Self {
        Self {
            inner: Some(sender),
        }
    }

    pub fn emit(&self, event: SessionEvent) {
        if let Some(sender) = &self.inner {
            let _ = sender.send(event);
        }
    }
}
