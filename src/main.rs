// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Build the Config and dispatch to the chosen report (or start the server)
// 4. Exit with proper code (0 = all URLs ok, 1 = some URLs failed, 2 = error)
//
// stdout only ever carries the report itself (JSON or CSV), so the output
// can be piped straight into a file or another tool.
// =============================================================================

mod cli;
mod config;
mod download;
mod error;
mod report;
mod server;
mod sources;
mod stats;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        "file_stats=debug"
    } else {
        "file_stats=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = every URL was processed
//   Ok(1) = at least one URL failed
//   Err   = the run could not happen at all (bad URL list, bad options, ...)
async fn run(cli: Cli) -> Result<i32> {
    let config = cli.to_config();

    match cli.command {
        Commands::Json { pretty } => handle_json(&config, pretty).await,
        Commands::Csv { output } => handle_csv(&config, output).await,
        Commands::Serve { port, output } => handle_serve(config, output, port).await,
    }
}

// Runs until Ctrl-C. Bad options fail here instead of on the first request.
async fn handle_serve(config: Config, output: std::path::PathBuf, port: u16) -> Result<i32> {
    config.validate().context("invalid options")?;

    let state = server::AppState {
        config,
        store: report::CsvStore::new(output),
    };
    server::serve(state, port)
        .await
        .with_context(|| format!("server on port {} failed", port))?;

    Ok(0)
}

async fn handle_json(config: &Config, pretty: bool) -> Result<i32> {
    let outcomes = report::records(config)
        .await
        .context("failed to collect file statistics")?;

    println!("{}", report::to_json(&outcomes, pretty)?);

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    Ok(if failed > 0 { 1 } else { 0 })
}

async fn handle_csv(config: &Config, output: std::path::PathBuf) -> Result<i32> {
    let store = report::CsvStore::new(output);
    let summary = report::csv_results(config, &store)
        .await
        .with_context(|| format!("failed to update {}", store.path().display()))?;

    tracing::info!(
        path = %store.path().display(),
        appended = summary.appended,
        skipped = summary.skipped,
        "CSV store updated"
    );
    // Only informational: the rows are already on disk at this point
    match report::read_csv(store.path()) {
        Ok(rows) => tracing::debug!(total = rows.len(), "CSV store row count"),
        Err(e) => tracing::warn!(error = %e.chain_message(), "CSV store has unreadable rows"),
    }

    std::io::stdout()
        .write_all(&summary.contents)
        .context("failed to write CSV to stdout")?;

    Ok(if summary.skipped > 0 { 1 } else { 0 })
}
