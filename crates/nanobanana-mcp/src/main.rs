mod server;
mod synth;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use nanobanana_docs::{document_url, DocumentCache, HttpSource, DEFAULT_BASE_URL};
use rmcp::ServiceExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::server::{RulesServer, SERVER_NAME};
use crate::synth::RuleSynthesizer;

/// Target of the startup line. Always enabled, whatever `RUST_LOG` says.
const STARTUP_TARGET: &str = "nanobanana_mcp::startup";

#[derive(Debug, Parser)]
#[command(name = "nanobanana-mcp", version, about = "MCP server serving Gemini image generation rules")]
struct Cli {
    /// Site hosting the image generation documentation
    #[arg(long, env = "NANOBANANA_DOC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    doc_base_url: String,

    /// How long a fetched documentation page is reused, in milliseconds
    #[arg(long, env = "NANOBANANA_CACHE_TTL_MS", default_value_t = 90_000)]
    cache_ttl_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let cache = DocumentCache::new(Arc::new(HttpSource::new()), document_url(&cli.doc_base_url)?)
        .with_ttl(Duration::from_millis(cli.cache_ttl_ms));
    let synthesizer = Arc::new(RuleSynthesizer::new(Arc::new(cache)));

    let service = RulesServer::new(synthesizer)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| error!("MCP server error: {}", e))?;
    announce_startup();
    service.waiting().await?;
    Ok(())
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// User directives plus the startup target, which stays at `info`.
fn log_filter(directives: &str) -> EnvFilter {
    let filter = EnvFilter::new(directives);
    match format!("{STARTUP_TARGET}=info").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn announce_startup() {
    info!(target: STARTUP_TARGET, "{} MCP server running on stdio", SERVER_NAME);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn log_output(directives: &str, emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(log_filter(directives))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "nanobanana-mcp",
            "--doc-base-url",
            "http://localhost:9000",
            "--cache-ttl-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(cli.doc_base_url, "http://localhost:9000");
        assert_eq!(cli.cache_ttl_ms, 500);
    }

    #[test]
    fn startup_line_survives_quiet_filters() {
        for directives in ["warn", "error", "off"] {
            let out = log_output(directives, || {
                announce_startup();
                info!("cache miss");
            });
            assert!(
                out.contains("nanobanana-rules MCP server running on stdio"),
                "missing startup line with {directives:?}: {out:?}"
            );
            assert!(!out.contains("cache miss"));
        }
    }

    #[test]
    fn default_filter_keeps_info() {
        let out = log_output("info", || info!("cache miss"));
        assert!(out.contains("cache miss"));
    }
}
