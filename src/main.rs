// Progress table driver
//
// `progress-table render` reads a JSON request from stdin and prints the
// processed table markup. `progress-table check-duplicates` reads page
// source from stdin and exits non-zero when a table-id is repeated.

use std::collections::HashMap;
use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use table_progress_tracking::{
    PassthroughHost, TrackingConfig, find_duplicate_table_ids, render_progress_table,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct RenderRequest {
    input: String,
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    config: Option<TrackingConfig>,
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

fn render() -> Result<ExitCode> {
    let request: RenderRequest =
        serde_json::from_str(&read_stdin()?).context("invalid render request")?;
    let config = request.config.unwrap_or_default();
    config.validate()?;

    let mut host = PassthroughHost::default();
    let html = render_progress_table(&mut host, &request.input, &request.attributes, &config);
    println!("{html}");

    if host.cache_disabled {
        tracing::info!("page caching disabled for this render");
    }
    Ok(ExitCode::SUCCESS)
}

fn check_duplicates() -> Result<ExitCode> {
    let duplicates = find_duplicate_table_ids(&read_stdin()?);
    if duplicates.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    for id in &duplicates {
        println!("{id}");
    }
    Ok(ExitCode::FAILURE)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match std::env::args().nth(1).as_deref() {
        Some("render") | None => render(),
        Some("check-duplicates") => check_duplicates(),
        Some(other) => bail!("unknown command '{other}' (expected 'render' or 'check-duplicates')"),
    }
}
