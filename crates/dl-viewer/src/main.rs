//! dl-viewer: page through, summarize and prune a PHP debug log.
//!
//! Loads a TOML configuration, then runs one debug log tool and prints its
//! result as JSON on stdout. Logs go to stderr.

use tracing_subscriber::EnvFilter;

use dl_log_parser::{FileLogSource, ViewerConfig};
use dl_viewer::invocation::{Action, Invocation};
use dl_viewer::registry::ToolRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "dl-viewer starting");

    let invocation = Invocation::from_args(std::env::args().skip(1))?;

    // ── Load config ─────────────────────────────────────────────
    let config = ViewerConfig::from_file(&invocation.config_path)?;
    tracing::debug!(
        config = %invocation.config_path,
        log_path = %config.log_path,
        per_page = config.per_page,
        links = config.links_enabled(),
        "config loaded"
    );

    let registry = ToolRegistry::with_defaults();

    match invocation.action {
        Action::List => {
            let tools: Vec<_> = registry
                .list()
                .into_iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.schema,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Action::Run { tool, args } => {
            let source = FileLogSource::new().with_max_bytes(config.max_bytes);
            let result = registry.dispatch(&tool, args, &source, &config).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
