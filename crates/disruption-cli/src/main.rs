//! `disruption-cli`: runs the full initial/revision/arbitration pipeline
//! once against a free-text disruption prompt and prints the `FinalOutput`
//! as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use disruption_cli::{build_registry, Settings};
use disruption_orchestrator::Orchestrator;

/// Deliberates a recovery plan for one disruption prompt.
#[derive(Debug, Parser)]
#[command(name = "disruption-cli", version, about)]
struct Cli {
    /// Path to the TOML file describing agent endpoints and tuning.
    #[arg(long, env = "DISRUPTION_CONFIG")]
    config: PathBuf,

    /// Free-text disruption prompt, e.g. "Flight EY123 grounded at DXB with a hydraulics fault".
    prompt: String,

    /// Pretty-print the JSON output instead of emitting it compact.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let registry = build_registry(&settings)?;
    let orchestrator = Orchestrator::new(registry, settings.timeout_table(), settings.arbitrator_config());

    let output = orchestrator.handle(&cli.prompt).await;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
