//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::USER_AGENT;

/// Initializes the HTTP client used for page requests.
///
/// Creates a `reqwest::Client` configured with:
/// - An explicit per-request timeout, so a stalled request becomes a
///   retryable failure instead of blocking the loop
/// - The crate's User-Agent
/// - Rustls TLS backend (no native TLS)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(timeout_seconds: u64) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(timeout_seconds.min(10)))
        .user_agent(USER_AGENT)
        .build()
}
