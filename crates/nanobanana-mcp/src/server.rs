use std::sync::Arc;

use nanobanana_core::{Mode, RuleArgs};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Deserialize;
use tracing::info;

use crate::synth::RuleSynthesizer;

/// Name reported to MCP clients.
pub const SERVER_NAME: &str = "nanobanana-rules";

const INSTRUCTIONS: &str = r#"Rules for calling the Gemini image generation API ("nano banana").

Call `get_rules` before writing a request. The result combines the live image generation documentation with fixed guidance:
- `policies`: usage policy, and whether generated images carry a SynthID watermark.
- `input_format`: the shape of `contents` (text parts and inlineData image parts).
- `prompting_guidelines`: what to describe and what to keep in mind.
- `template`: example request bodies per mode. Pass `mode` to get only one.

Pass `lang` to read the documentation in another language (default "ja") and `model` to fill the templates with a specific model name."#;

// --- Request types ---

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetRulesRequest {
    /// Documentation language, e.g. "ja" or "en". Default: "ja". An empty string uses the site's default language.
    lang: Option<String>,
    /// Model name used in the templates. Default: "gemini-2.5-flash-image-preview"
    model: Option<String>,
    /// Return only the template for this mode: "text_to_image" or "image_edit". Omit to get every template.
    mode: Option<Mode>,
}

// --- Server ---

#[derive(Clone)]
pub struct RulesServer {
    synthesizer: Arc<RuleSynthesizer>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RulesServer {
    pub fn new(synthesizer: Arc<RuleSynthesizer>) -> Self {
        Self {
            synthesizer,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get image generation rules and guidelines for Gemini API")]
    async fn get_rules(
        &self,
        Parameters(req): Parameters<GetRulesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let args = RuleArgs::resolve(req.lang, req.model, req.mode);
        info!(lang = %args.lang, model = %args.model, mode = ?args.mode, "get_rules");
        let text = self
            .synthesizer
            .get_rules(&args)
            .await
            .map_err(serialization_error)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for RulesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn serialization_error(e: serde_json::Error) -> McpError {
    McpError::internal_error(format!("Serialization error: {}", e), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::tests::{synthesizer, StubSource, DOC_HTML};
    use nanobanana_docs::ManualClock;
    use rmcp::model::RawContent;

    fn server(source: Arc<StubSource>) -> RulesServer {
        RulesServer::new(Arc::new(synthesizer(source, Arc::new(ManualClock::new()))))
    }

    fn text_of(result: &CallToolResult) -> String {
        assert_eq!(result.content.len(), 1);
        match &result.content[0].raw {
            RawContent::Text(text_content) => text_content.text.clone(),
            _ => panic!("Expected text content"),
        }
    }

    #[tokio::test]
    async fn get_rules_returns_pretty_json() {
        let server = server(Arc::new(StubSource::serving(DOC_HTML)));
        let req = GetRulesRequest {
            lang: Some("en".into()),
            model: Some("custom-model".into()),
            mode: Some(Mode::TextToImage),
        };

        let result = server.get_rules(Parameters(req)).await.unwrap();
        let text = text_of(&result);
        assert!(text.contains('\n'));

        let val: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(val["policies"]["synthid_watermark_expected"], true);
        assert_eq!(val["template"]["text_to_image"]["model"], "custom-model");
        assert!(val["template"].get("image_edit").is_none());
    }

    #[tokio::test]
    async fn get_rules_failure_is_not_a_tool_error() {
        let server = server(Arc::new(StubSource::failing(500)));
        let req = GetRulesRequest {
            lang: Some("fr".into()),
            ..Default::default()
        };

        let result = server.get_rules(Parameters(req)).await.unwrap();
        assert_ne!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.contains("lang=fr"));
        assert!(text.contains("500"));
    }

    #[test]
    fn request_rejects_unknown_mode() {
        let ok: GetRulesRequest = serde_json::from_str(r#"{"mode": "image_edit"}"#).unwrap();
        assert_eq!(ok.mode, Some(Mode::ImageEdit));
        assert!(serde_json::from_str::<GetRulesRequest>(r#"{"mode": "image_editing"}"#).is_err());
    }

    #[test]
    fn all_arguments_optional() {
        let req: GetRulesRequest = serde_json::from_str("{}").unwrap();
        assert!(req.lang.is_none() && req.model.is_none() && req.mode.is_none());
    }

    #[test]
    fn info_enables_tools() {
        let server = server(Arc::new(StubSource::serving(DOC_HTML)));
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("get_rules"));
        assert_eq!(info.server_info.name, "nanobanana-rules");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn serialization_failure_is_internal_error() {
        // maps need string keys in JSON
        let unserializable = std::collections::HashMap::from([((1u8, 2u8), 3u8)]);
        let err = serde_json::to_string_pretty(&unserializable).unwrap_err();

        let mcp_err = serialization_error(err);
        assert_eq!(mcp_err.code.0, -32603);
        assert!(mcp_err.message.starts_with("Serialization error:"));
    }
}
