//! Configuration types.
//!
//! This module defines the library configuration, the fetcher's subset of it,
//! and the enums shared with command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_ENDPOINT, DEFAULT_LENGTH_LIMIT, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PATH,
    DEFAULT_PAGE_SIZE, DEFAULT_RECORDS_PATH, DEFAULT_RETRY_DELAY_MS, DEFAULT_SEARCH_QUERY,
    DEFAULT_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Rejected configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Page size must request at least one record.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// A zero limit would put every record in its own oversized cell.
    #[error("cell length limit must be at least 1")]
    ZeroLengthLimit,

    /// A zero timeout would fail every request.
    #[error("request timeout must be at least 1 second")]
    ZeroTimeout,

    /// Endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint '{0}': expected an http or https URL")]
    InvalidEndpoint(String),
}

/// Settings the fetcher is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Records requested per page
    pub page_size: u32,
    /// Pause between successful pages; first delay of the backoff after a failure
    pub retry_delay: Duration,
    /// Consecutive failures tolerated per cursor (`None` retries forever)
    pub max_retries: Option<u32>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_retries: Some(DEFAULT_MAX_RETRIES),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FetchConfig {
    /// Checks the values no page request can be made with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        match url::Url::parse(&self.endpoint) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidEndpoint(self.endpoint.clone())),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use omnivore_export::Config;
///
/// let config = Config {
///     search_query: "in:archive".to_string(),
///     length_limit: 50_000,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// GraphQL endpoint URL
    pub endpoint: String,

    /// Records requested per page
    pub page_size: u32,

    /// Inter-request pause
    pub retry_delay: Duration,

    /// Consecutive failures tolerated per cursor (`None` retries forever)
    pub max_retries: Option<u32>,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Search expression passed to the API
    pub search_query: String,

    /// Maximum raw length of a packed cell, in characters
    pub length_limit: usize,

    /// Intermediate JSON record file
    pub records_path: PathBuf,

    /// Final document path
    pub output_path: PathBuf,

    /// Whether a live run also persists the fetched records
    pub save_records: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_retries: Some(DEFAULT_MAX_RETRIES),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            length_limit: DEFAULT_LENGTH_LIMIT,
            records_path: PathBuf::from(DEFAULT_RECORDS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            save_records: true,
        }
    }
}

impl Config {
    /// Checks the values a run cannot proceed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length_limit == 0 {
            return Err(ConfigError::ZeroLengthLimit);
        }
        self.fetch_config().validate()
    }

    /// The settings handed to the fetcher.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            endpoint: self.endpoint.clone(),
            page_size: self.page_size,
            retry_delay: self.retry_delay,
            max_retries: self.max_retries,
            timeout_seconds: self.timeout_seconds,
        }
    }
}
