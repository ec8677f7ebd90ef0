//! Output module for storing records and reporting on sessions
//!
//! This module handles:
//! - Writing record images and a JSONL manifest to a directory
//! - Formatting session statistics

mod directory;
pub mod stats;
mod traits;

pub use directory::{image_file_name, DirectorySink};
pub use stats::{format_statistics, print_statistics};
pub use traits::{ManifestEntry, OutputError, OutputResult, RecordSink};
