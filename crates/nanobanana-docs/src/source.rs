use async_trait::async_trait;
use reqwest::header;
use tracing::warn;
use url::Url;

use crate::DocError;

pub const DEFAULT_BASE_URL: &str = "https://ai.google.dev";
pub const DOC_PATH: &str = "/gemini-api/docs/image-generation";
pub const USER_AGENT: &str = "MCP-nanobanana-rules/0.1";

/// Resolve the documentation page against a site base such as `https://ai.google.dev`.
pub fn document_url(base_url: &str) -> Result<Url, DocError> {
    Ok(Url::parse(base_url)?.join(DOC_PATH)?)
}

/// Fetches the raw text of a document. One call is one network round trip.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, DocError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &Url) -> Result<String, DocError> {
        let resp = self
            .client
            .get(url.as_str())
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        // status_text is the canonical reason for the code, not the phrase the server sent
        let status = resp.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "documentation fetch rejected");
            return Err(DocError::Fetch {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        Ok(resp.text().await?)
    }
}
