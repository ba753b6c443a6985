//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `omnivore_export` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - API key resolution
//! - Ctrl-C cancellation and user-facing output
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::process;
use tokio_util::sync::CancellationToken;

use omnivore_export::config::{Cli, Command};
use omnivore_export::initialization::init_logger_with;
use omnivore_export::{
    resolve_api_key_async, run_export, run_fetch, run_pack, ApiKey, ExportReport,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A .env next to the working directory may carry OMNIVORE_API_KEY
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.to_config();
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current request");
            ctrl_c_token.cancel();
        }
    });

    let result: Result<ExportReport> = async {
        match &cli.command {
            Command::Pack(_) => run_pack(&config).await,
            Command::Fetch(_) => {
                run_fetch(&config, obtain_api_key(&cli).await?, Some(cancel)).await
            }
            Command::Run(_) => {
                run_export(&config, obtain_api_key(&cli).await?, Some(cancel)).await
            }
        }
    }
    .await;

    match result {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            eprintln!("omnivore_export error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn obtain_api_key(cli: &Cli) -> Result<ApiKey> {
    resolve_api_key_async(cli.api_key().map(str::to_string))
        .await
        .context("Failed to obtain API key")
}

fn print_report(report: &ExportReport) {
    match report.pages {
        Some(pages) => println!(
            "✅ Fetched {} record{} in {} page{} ({} failed request{} retried) in {:.1}s",
            report.records,
            if report.records == 1 { "" } else { "s" },
            pages,
            if pages == 1 { "" } else { "s" },
            report.failed_attempts,
            if report.failed_attempts == 1 { "" } else { "s" },
            report.elapsed_seconds
        ),
        None => println!(
            "✅ Loaded {} record{} in {:.1}s",
            report.records,
            if report.records == 1 { "" } else { "s" },
            report.elapsed_seconds
        ),
    }
    if let Some(path) = &report.records_path {
        println!("Records saved in {}", path.display());
    }
    if let (Some(cells), Some(path)) = (report.cells, &report.output_path) {
        println!(
            "Packed into {} cell{} in {}",
            cells,
            if cells == 1 { "" } else { "s" },
            path.display()
        );
    }
}
