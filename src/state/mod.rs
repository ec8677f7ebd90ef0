//! State module for tracking session progress
//!
//! This module provides the diagnostic side of a search session. Fetch and
//! filter failures never interrupt the record stream; instead they are
//! classified here, counted, and optionally forwarded to an observer.
//!
//! # Components
//!
//! - `SkipReason`: Why a raw search result did not become a record
//! - `Unavailability`: Why a page fetch produced nothing
//! - `SessionEvent`: Structured events sent on an optional diagnostic channel
//! - `SessionStats`: Running counters for one session

mod events;
mod outcome;
mod session_stats;

// Re-export main types
pub use events::{EventSender, SessionEvent};
pub use outcome::{ImageFailure, SkipReason, Unavailability};
pub use session_stats::SessionStats;
