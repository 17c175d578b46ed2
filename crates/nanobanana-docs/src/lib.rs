//! Cached access to the Gemini image generation documentation page.
//!
//! [`DocumentCache`] holds at most one snapshot per language and re-fetches it through
//! a [`DocumentSource`] once the snapshot is older than the TTL. Expiry is checked
//! lazily on read; nothing runs in the background.

pub mod cache;
pub mod clock;
pub mod source;

use thiserror::Error;

pub use url::Url;

pub use cache::{CacheEntry, Document, DocumentCache, CACHE_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use source::{document_url, DocumentSource, HttpSource, DEFAULT_BASE_URL, DOC_PATH, USER_AGENT};

#[derive(Error, Debug)]
pub enum DocError {
    #[error("Fetch failed: {status} {status_text}")]
    Fetch { status: u16, status_text: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid documentation URL: {0}")]
    Url(#[from] url::ParseError),
}
