//! Command-line interface.
//!
//! ```bash
//! # Fetch everything and write nodes-id-url.json + nodes-id-url.csv
//! omnivore_export run --api-key 0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9
//!
//! # Only fetch, then pack later with a different cell limit
//! omnivore_export fetch --query "in:archive"
//! omnivore_export pack --length-limit 50000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::constants::{
    DEFAULT_ENDPOINT, DEFAULT_LENGTH_LIMIT, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PATH,
    DEFAULT_PAGE_SIZE, DEFAULT_RECORDS_PATH, DEFAULT_RETRY_DELAY_MS, DEFAULT_SEARCH_QUERY,
    DEFAULT_TIMEOUT_SECS,
};
use super::types::{Config, LogFormat, LogLevel};

/// Exports Omnivore saved items into spreadsheet-sized cells.
#[derive(Debug, Parser)]
#[command(name = "omnivore_export", version, about)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline stage to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every record and save them as a JSON array
    Fetch(FetchArgs),
    /// Pack a saved JSON array into the delimited document
    Pack(PackArgs),
    /// Fetch, save and pack in one go
    Run(RunArgs),
}

/// Options for talking to the API.
#[derive(Debug, Args)]
pub struct ApiArgs {
    /// API key (falls back to OMNIVORE_API_KEY, then an interactive prompt)
    #[arg(long)]
    pub api_key: Option<String>,

    /// GraphQL endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Search expression
    #[arg(long, default_value = DEFAULT_SEARCH_QUERY)]
    pub query: String,

    /// Records per request
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Pause between requests in milliseconds (first backoff step after a failure)
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Consecutive failures tolerated for one page before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, conflicts_with = "retry_forever")]
    pub max_retries: u32,

    /// Never give up on a failing page
    #[arg(long)]
    pub retry_forever: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

/// `fetch` options.
#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Where to save the fetched records
    #[arg(long, default_value = DEFAULT_RECORDS_PATH)]
    pub records: PathBuf,
}

/// `pack` options.
#[derive(Debug, Args)]
pub struct PackArgs {
    /// JSON array of records to pack
    #[arg(long, default_value = DEFAULT_RECORDS_PATH)]
    pub records: PathBuf,

    /// Output document
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Maximum characters per cell
    #[arg(long, default_value_t = DEFAULT_LENGTH_LIMIT)]
    pub length_limit: usize,
}

/// `run` options.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Where to save the fetched records
    #[arg(long, default_value = DEFAULT_RECORDS_PATH)]
    pub records: PathBuf,

    /// Skip saving the intermediate record file
    #[arg(long)]
    pub no_save_records: bool,

    /// Output document
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Maximum characters per cell
    #[arg(long, default_value_t = DEFAULT_LENGTH_LIMIT)]
    pub length_limit: usize,
}

impl ApiArgs {
    fn apply(&self, config: &mut Config) {
        config.endpoint = self.endpoint.clone();
        config.search_query = self.query.clone();
        config.page_size = self.page_size;
        config.retry_delay = Duration::from_millis(self.retry_delay_ms);
        config.max_retries = if self.retry_forever {
            None
        } else {
            Some(self.max_retries)
        };
        config.timeout_seconds = self.timeout_seconds;
    }
}

impl Cli {
    /// The API key given on the command line, if the subcommand takes one.
    pub fn api_key(&self) -> Option<&str> {
        match &self.command {
            Command::Fetch(args) => args.api.api_key.as_deref(),
            Command::Run(args) => args.api.api_key.as_deref(),
            Command::Pack(_) => None,
        }
    }

    /// Library configuration for the selected subcommand.
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..Default::default()
        };

        match &self.command {
            Command::Fetch(args) => {
                args.api.apply(&mut config);
                config.records_path = args.records.clone();
                config.save_records = true;
            }
            Command::Pack(args) => {
                config.records_path = args.records.clone();
                config.output_path = args.output.clone();
                config.length_limit = args.length_limit;
            }
            Command::Run(args) => {
                args.api.apply(&mut config);
                config.records_path = args.records.clone();
                config.save_records = !args.no_save_records;
                config.output_path = args.output.clone();
                config.length_limit = args.length_limit;
            }
        }

        config
    }
}
