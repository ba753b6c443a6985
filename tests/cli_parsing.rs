//! Tests for CLI subcommand parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use omnivore_export::config::{
    Cli, Command, DEFAULT_ENDPOINT, DEFAULT_LENGTH_LIMIT, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_PATH,
    DEFAULT_PAGE_SIZE, DEFAULT_RECORDS_PATH, DEFAULT_SEARCH_QUERY,
};
use omnivore_export::{LogFormat, LogLevel};

#[test]
fn test_run_defaults() {
    let cli = Cli::try_parse_from(["omnivore_export", "run"]).expect("parses");
    assert!(matches!(cli.command, Command::Run(_)));
    assert_eq!(cli.api_key(), None);

    let config = cli.to_config();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.search_query, DEFAULT_SEARCH_QUERY);
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.max_retries, Some(DEFAULT_MAX_RETRIES));
    assert_eq!(config.length_limit, DEFAULT_LENGTH_LIMIT);
    assert_eq!(config.records_path, PathBuf::from(DEFAULT_RECORDS_PATH));
    assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    assert!(config.save_records);
    assert_eq!(config.fetch_config().timeout_seconds, config.timeout_seconds);
    assert!(config.validate().is_ok());
}

#[test]
fn test_fetch_with_options() {
    let cli = Cli::try_parse_from([
        "omnivore_export",
        "fetch",
        "--api-key",
        "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9",
        "--query",
        "in:archive",
        "--page-size",
        "50",
        "--retry-delay-ms",
        "250",
        "--records",
        "saved.json",
    ])
    .expect("parses");

    assert_eq!(cli.api_key(), Some("0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9"));
    let config = cli.to_config();
    assert_eq!(config.search_query, "in:archive");
    assert_eq!(config.page_size, 50);
    assert_eq!(config.retry_delay, Duration::from_millis(250));
    assert_eq!(config.records_path, PathBuf::from("saved.json"));
}

#[test]
fn test_retry_forever_disables_ceiling() {
    let cli = Cli::try_parse_from(["omnivore_export", "run", "--retry-forever"]).expect("parses");
    assert_eq!(cli.to_config().max_retries, None);
}

#[test]
fn test_retry_forever_conflicts_with_max_retries() {
    let result = Cli::try_parse_from([
        "omnivore_export",
        "run",
        "--retry-forever",
        "--max-retries",
        "3",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_pack_takes_no_api_options() {
    let cli = Cli::try_parse_from([
        "omnivore_export",
        "pack",
        "--records",
        "in.json",
        "--output",
        "out.csv",
        "--length-limit",
        "500",
    ])
    .expect("parses");
    let config = cli.to_config();
    assert_eq!(config.records_path, PathBuf::from("in.json"));
    assert_eq!(config.output_path, PathBuf::from("out.csv"));
    assert_eq!(config.length_limit, 500);

    assert!(Cli::try_parse_from(["omnivore_export", "pack", "--api-key", "x"]).is_err());
}

#[test]
fn test_run_without_saving_records() {
    let cli =
        Cli::try_parse_from(["omnivore_export", "run", "--no-save-records"]).expect("parses");
    assert!(!cli.to_config().save_records);
}

#[test]
fn test_global_log_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "omnivore_export",
        "pack",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("parses");
    assert!(matches!(cli.log_level, LogLevel::Debug));
    assert!(matches!(cli.log_format, LogFormat::Json));

    let config = cli.to_config();
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
}

#[test]
fn test_zero_page_size_fails_validation() {
    let cli =
        Cli::try_parse_from(["omnivore_export", "run", "--page-size", "0"]).expect("parses");
    assert!(cli.to_config().validate().is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["omnivore_export"]).is_err());
}
