//! omnivore_export library: bulk export of Omnivore saved items
//!
//! This library walks the cursor-paginated Omnivore search API to completion,
//! tolerating transient failures without ever skipping a page, and packs the
//! fetched records into length-bounded cells of a single-line delimited
//! document suitable for spreadsheet import.
//!
//! # Example
//!
//! ```no_run
//! use omnivore_export::{run_export, ApiKey, Config, CredentialSource};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = ApiKey::parse("0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9", CredentialSource::Flag)?;
//! let config = Config {
//!     length_limit: 50_000,
//!     ..Default::default()
//! };
//!
//! let report = run_export(&config, key, None).await?;
//! println!("Packed {} records into {:?} cells", report.records, report.cells);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

mod app;
pub mod config;
pub mod credential;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
pub mod pack;

// Re-export public API
pub use config::{Config, FetchConfig, LogFormat, LogLevel};
pub use credential::{resolve_api_key, resolve_api_key_async, ApiKey, CredentialSource};
pub use error_handling::{CredentialError, ExportError, FetchError, Rejection};
pub use fetch::{fetch_all, Completion, Fetcher, GraphqlClient, PageSource, Record};
pub use pack::{pack, pack_document, render_document};
pub use run::{run_export, run_fetch, run_pack, ExportReport};

// Internal run module (wires fetch, export and pack together)
mod run {
    use anyhow::{Context, Result};
    use log::info;
    use std::path::PathBuf;
    use std::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::app::print_error_statistics;
    use crate::config::Config;
    use crate::credential::ApiKey;
    use crate::export::{read_records, write_document, write_records};
    use crate::fetch::{Completion, FetchReport, Fetcher, GraphqlClient, Record};
    use crate::initialization::init_client;
    use crate::pack::pack_document;

    /// Results of a pipeline run.
    ///
    /// Fields for stages that did not run are `None`.
    #[derive(Debug, Clone)]
    pub struct ExportReport {
        /// Records fetched or loaded
        pub records: usize,
        /// Successful page requests (`None` when records came from a file)
        pub pages: Option<usize>,
        /// Failed requests that were retried
        pub failed_attempts: usize,
        /// Why pagination stopped
        pub completion: Option<Completion>,
        /// Record file written by this run
        pub records_path: Option<PathBuf>,
        /// Cells in the output document
        pub cells: Option<usize>,
        /// Document written by this run
        pub output_path: Option<PathBuf>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl ExportReport {
        fn from_fetch(fetch: &FetchReport) -> Self {
            ExportReport {
                records: fetch.records.len(),
                pages: Some(fetch.pages),
                failed_attempts: fetch.failed_attempts,
                completion: Some(fetch.completion),
                records_path: None,
                cells: None,
                output_path: None,
                elapsed_seconds: 0.0,
            }
        }
    }

    async fn fetch_records(
        config: &Config,
        api_key: ApiKey,
        cancel: Option<CancellationToken>,
    ) -> Result<FetchReport> {
        config.validate().context("Invalid configuration")?;

        let http = init_client(config.timeout_seconds).context("Failed to initialize HTTP client")?;
        let source = GraphqlClient::new(http, config.endpoint.clone(), api_key);
        let mut fetcher = Fetcher::new(source, config.fetch_config(), config.search_query.clone());
        if let Some(token) = cancel {
            fetcher = fetcher.with_cancellation(token);
        }

        info!(
            "Fetching '{}' from {} ({} per page)",
            config.search_query, config.endpoint, config.page_size
        );
        let result = fetcher.run().await;
        print_error_statistics(fetcher.stats());
        result.context("Failed to fetch records")
    }

    async fn pack_and_write(config: &Config, records: &[Record]) -> Result<usize> {
        let (document, cells) = pack_document(records, config.length_limit);
        write_document(&config.output_path, &document)
            .await
            .context("Failed to write output document")?;
        Ok(cells)
    }

    /// Fetches every record and saves them to `config.records_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the fetch hits a fatal
    /// condition, or the record file cannot be written. Nothing is written
    /// when the fetch fails.
    pub async fn run_fetch(
        config: &Config,
        api_key: ApiKey,
        cancel: Option<CancellationToken>,
    ) -> Result<ExportReport> {
        let start = Instant::now();
        let fetched = fetch_records(config, api_key, cancel).await?;

        write_records(&config.records_path, &fetched.records)
            .await
            .context("Failed to save records")?;

        Ok(ExportReport {
            records_path: Some(config.records_path.clone()),
            elapsed_seconds: start.elapsed().as_secs_f64(),
            ..ExportReport::from_fetch(&fetched)
        })
    }

    /// Packs the records saved at `config.records_path` into `config.output_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record file is missing or malformed, or the
    /// document cannot be written.
    pub async fn run_pack(config: &Config) -> Result<ExportReport> {
        let start = Instant::now();
        config.validate().context("Invalid configuration")?;

        let records = read_records(&config.records_path)
            .await
            .context("Failed to load records")?;
        let cells = pack_and_write(config, &records).await?;

        Ok(ExportReport {
            records: records.len(),
            pages: None,
            failed_attempts: 0,
            completion: None,
            records_path: None,
            cells: Some(cells),
            output_path: Some(config.output_path.clone()),
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }

    /// Fetches, optionally saves, and packs in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage fails. A failed fetch writes nothing.
    pub async fn run_export(
        config: &Config,
        api_key: ApiKey,
        cancel: Option<CancellationToken>,
    ) -> Result<ExportReport> {
        let start = Instant::now();
        let fetched = fetch_records(config, api_key, cancel).await?;

        let records_path = if config.save_records {
            write_records(&config.records_path, &fetched.records)
                .await
                .context("Failed to save records")?;
            Some(config.records_path.clone())
        } else {
            None
        };

        let cells = pack_and_write(config, &fetched.records).await?;

        Ok(ExportReport {
            records_path,
            cells: Some(cells),
            output_path: Some(config.output_path.clone()),
            elapsed_seconds: start.elapsed().as_secs_f64(),
            ..ExportReport::from_fetch(&fetched)
        })
    }
}
