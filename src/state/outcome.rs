//! Outcome classifications for skipped results and unavailable pages
use std::fmt;

/// Why an image download produced no bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFailure {
    /// The image host answered with a non-success status
    HttpError,

    /// Connection refused, timeout, DNS failure, or a truncated body
    NetworkError,

    /// The body was not a decodable image
    DecodeError,
}

impl ImageFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HttpError => "http_error",
            Self::NetworkError => "network_error",
            Self::DecodeError => "decode_error",
        }
    }
}

/// Why a raw search result was dropped instead of being yielded
///
/// Checks run in this order and the first failing one wins: `Malformed`,
/// `Plus`, `MissingCaption`, `MissingImageUrl`, `ImageUnavailable`. `Duplicate`
/// is decided afterwards by the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The page element was not an object of the expected shape
    Malformed,

    /// Premium content
    Plus,

    /// No caption, or an empty one
    MissingCaption,

    /// No `urls` object, or no `urls.full`
    MissingImageUrl,

    /// The image could not be downloaded or decoded
    ImageUnavailable(ImageFailure),

    /// The id was already yielded in this session
    Duplicate,
}

impl SkipReason {
    /// Returns true if the result itself was ineligible (no network call was made for it)
    pub fn is_filtered(&self) -> bool {
        matches!(
            self,
            Self::Malformed | Self::Plus | Self::MissingCaption | Self::MissingImageUrl
        )
    }

    /// Returns true if the skip was caused by a failed image download
    pub fn is_download_failure(&self) -> bool {
        matches!(self, Self::ImageUnavailable(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Plus => "plus",
            Self::MissingCaption => "missing_caption",
            Self::MissingImageUrl => "missing_image_url",
            Self::ImageUnavailable(ImageFailure::HttpError) => "image_http_error",
            Self::ImageUnavailable(ImageFailure::NetworkError) => "image_network_error",
            Self::ImageUnavailable(ImageFailure::DecodeError) => "image_decode_error",
            Self::Duplicate => "duplicate",
        }
    }

    /// Returns all skip reasons
    pub fn all_reasons() -> Vec<Self> {
        vec![
            Self::Malformed,
            Self::Plus,
            Self::MissingCaption,
            Self::MissingImageUrl,
            Self::ImageUnavailable(ImageFailure::HttpError),
            Self::ImageUnavailable(ImageFailure::NetworkError),
            Self::ImageUnavailable(ImageFailure::DecodeError),
            Self::Duplicate,
        ]
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a page fetch produced no results
///
/// The search loop treats all of these the same way; the distinction only
/// exists for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unavailability {
    /// The endpoint answered with an empty or falsy JSON value
    Empty,

    /// Non-success HTTP status
    HttpError,

    /// Transport failure
    NetworkError,

    /// The body was not JSON, or not a JSON array
    ParseError,
}

impl Unavailability {
    /// Returns true if the topic legitimately ran out of results
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::HttpError => "http_error",
            Self::NetworkError => "network_error",
            Self::ParseError => "parse_error",
        }
    }
}

impl fmt::Display for Unavailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
