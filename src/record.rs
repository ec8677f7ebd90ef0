//! Raw search results and normalized records
//!
//! A page from the topic search endpoint is a JSON array of loosely typed
//! objects. Only a handful of attributes matter here, and every one of them is
//! optional, so `RawResult` keeps them as options and leaves eligibility
//! decisions to the processor.

use image::DynamicImage;
use serde::Deserialize;
use serde_json::Value;

/// One element of a search page, as received
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    /// An object that decoded into the expected shape
    Result(RawResult),

    /// Anything else found in the page array (numbers, strings, mistyped fields)
    Malformed(Value),
}

impl RawEntry {
    /// Decodes a single page element, keeping undecodable ones as `Malformed`
    pub fn from_value(value: Value) -> Self {
        match RawResult::deserialize(&value) {
            Ok(result) => Self::Result(result),
            Err(_) => Self::Malformed(value),
        }
    }
}

/// The attributes of a search result this crate cares about
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawResult {
    /// Opaque photo identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Premium-content marker; any truthy value excludes the result
    #[serde(default)]
    pub plus: Option<Value>,

    /// Caption text
    #[serde(default)]
    pub alt_description: Option<String>,

    /// Image locations by size
    #[serde(default)]
    pub urls: Option<RawUrls>,
}

/// The `urls` object of a search result
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawUrls {
    #[serde(default)]
    pub full: Option<String>,
}

impl RawResult {
    /// Returns true if the result is marked as premium content
    pub fn is_plus(&self) -> bool {
        self.plus.as_ref().is_some_and(is_truthy)
    }

    /// Returns the caption, treating an empty string as absent
    pub fn caption(&self) -> Option<&str> {
        non_empty(self.alt_description.as_deref())
    }

    /// Returns the full-size image URL, treating an empty string as absent
    pub fn full_image_url(&self) -> Option<&str> {
        non_empty(self.urls.as_ref().and_then(|urls| urls.full.as_deref()))
    }

    /// Returns the id, treating an empty string as absent
    pub fn photo_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }
}

/// A normalized, labeled dataset entry
///
/// Only built once the caption, image URL and decoded image are all present.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: Option<String>,
    pub image: DynamicImage,
    pub text: String,
    pub topic: String,
    pub image_url: String,
}

/// JSON truthiness: `null`, `false`, zero, and empty strings/arrays/objects are falsy
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
