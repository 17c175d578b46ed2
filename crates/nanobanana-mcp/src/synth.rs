use std::sync::Arc;

use nanobanana_core::{build_rule_document, extract_signals, RuleArgs, RuleDocument};
use nanobanana_docs::{DocError, DocumentCache};
use tracing::{debug, warn};

/// Combines the cached documentation snapshot with the static guidelines.
pub struct RuleSynthesizer {
    cache: Arc<DocumentCache>,
}

impl RuleSynthesizer {
    pub fn new(cache: Arc<DocumentCache>) -> Self {
        Self { cache }
    }

    pub async fn synthesize(&self, args: &RuleArgs) -> Result<RuleDocument, DocError> {
        let doc = self.cache.get_document(&args.lang).await?;
        let signals = extract_signals(&doc.text);
        debug!(
            lang = %args.lang,
            watermark = signals.has_watermark_marker,
            binary_encoding = signals.mentions_binary_encoding,
            "extracted documentation signals"
        );
        Ok(build_rule_document(&doc.source_url, &signals, args))
    }

    /// Text payload for the `get_rules` tool: the pretty-printed rule document, or a
    /// sentence describing why the documentation could not be fetched. Only a
    /// serialization failure is returned as an error.
    pub async fn get_rules(&self, args: &RuleArgs) -> serde_json::Result<String> {
        match self.synthesize(args).await {
            Ok(rules) => serde_json::to_string_pretty(&rules),
            Err(e) => {
                warn!(lang = %args.lang, error = %e, "documentation fetch failed");
                Ok(failure_message(&args.lang, &e))
            }
        }
    }
}

pub fn failure_message(lang: &str, err: &DocError) -> String {
    format!("Failed to fetch documentation for lang={}. {}", lang, err)
}
