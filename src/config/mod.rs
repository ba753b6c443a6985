//! Application configuration and constants.
//!
//! This module provides:
//! - Default values for the fetcher, packer and output paths
//! - The library [`Config`] and the fetcher's [`FetchConfig`] subset
//! - Log level and format enums shared with the CLI
//! - The `clap` command-line definition

mod cli;
mod constants;
mod types;

pub use cli::{ApiArgs, Cli, Command, FetchArgs, PackArgs, RunArgs};

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigError, FetchConfig, LogFormat, LogLevel};
