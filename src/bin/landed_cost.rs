//! Command-line front end: prices one shipment or a batch from JSON.

use anyhow::{Context, Result};
use clap::Parser;
use landed_cost::telemetry::init_tracing;
use landed_cost::{LandedCostEngine, LandedCostRequest, Settings};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Price international parcels end to end")]
struct Cli {
    /// Settings file (default: config/landed-cost.*, optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request JSON file; reads stdin when omitted
    #[arg(long)]
    request: Option<PathBuf>,

    /// Treat the input as a JSON array of requests
    #[arg(long, default_value_t = false)]
    batch: bool,

    /// Emit JSON log lines
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Pretty-print the response
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if cli.json_logs {
        settings.logging.json = true;
    }
    init_tracing(&settings.logging);

    let engine = LandedCostEngine::from_settings(&settings).context("building engine")?;
    let input = read_input(cli.request.as_ref())?;

    let response = if cli.batch {
        let requests: Vec<LandedCostRequest> =
            serde_json::from_str(&input).context("parsing batch request")?;
        let items = engine.quote_batch(requests).await;
        let rendered: Vec<_> = items
            .into_iter()
            .map(|item| match item.result {
                Ok(breakdown) => json!({ "index": item.index, "ok": breakdown }),
                Err(e) => json!({
                    "index": item.index,
                    "request_id": item.request_id,
                    "error": e.to_string(),
                }),
            })
            .collect();
        serde_json::Value::Array(rendered)
    } else {
        let request: LandedCostRequest =
            serde_json::from_str(&input).context("parsing request")?;
        let breakdown = engine.quote(request).await?;
        serde_json::to_value(breakdown)?
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer)
        }
    }
}
