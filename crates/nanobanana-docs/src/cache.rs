use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::source::DocumentSource;
use crate::DocError;

pub const CACHE_TTL: Duration = Duration::from_millis(90_000);

/// One fetched snapshot. Replaced wholesale on every re-fetch.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub fetched_at: Instant,
    pub source_url: String,
    pub raw_text: String,
}

/// What callers get back: the URL actually fetched and the page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source_url: String,
    pub text: String,
}

impl From<&CacheEntry> for Document {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            source_url: entry.source_url.clone(),
            text: entry.raw_text.clone(),
        }
    }
}

/// Per-language documentation cache with a fixed TTL.
///
/// The lock is only held for lookups and inserts, never across a fetch, so two
/// concurrent misses for the same language may both fetch; the last insert wins.
pub struct DocumentCache {
    source: Arc<dyn DocumentSource>,
    clock: Arc<dyn Clock>,
    doc_url: Url,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl DocumentCache {
    pub fn new(source: Arc<dyn DocumentSource>, doc_url: Url) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            doc_url,
            ttl: CACHE_TTL,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cache_key(lang: &str) -> String {
        format!("doc:{lang}")
    }

    /// URL for `lang`. An empty `lang` omits `hl` so the site picks its default language.
    pub fn resolve_url(&self, lang: &str) -> Url {
        let mut url = self.doc_url.clone();
        if !lang.is_empty() {
            url.query_pairs_mut().append_pair("hl", lang);
        }
        url
    }

    /// Return the document for `lang`, fetching it only when no unexpired snapshot exists.
    /// Failed fetches are not cached.
    pub async fn get_document(&self, lang: &str) -> Result<Document, DocError> {
        let key = Self::cache_key(lang);
        let now = self.clock.now();

        if let Some(doc) = self.lookup(&key, now) {
            debug!(key = %key, "documentation cache hit");
            return Ok(doc);
        }

        let url = self.resolve_url(lang);
        info!(key = %key, url = %url, "fetching documentation");
        let text = self.source.fetch(&url).await?;

        let entry = CacheEntry {
            key: key.clone(),
            fetched_at: now,
            source_url: url.to_string(),
            raw_text: text,
        };
        let doc = Document::from(&entry);
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
        Ok(doc)
    }

    fn lookup(&self, key: &str, now: Instant) -> Option<Document> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| now.duration_since(entry.fetched_at) < self.ttl)
            .map(Document::from)
    }
}
