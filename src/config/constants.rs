//! Configuration constants.
//!
//! Defaults for the fetcher, the packer and the CLI. Every value here can be
//! overridden through [`Config`](crate::Config) or the matching command-line flag.

/// Omnivore GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api-prod.omnivore.app/api/graphql";

/// Records requested per page. The API caps `first` at 100.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pause between consecutive requests in milliseconds.
///
/// Applied after each successful page that is followed by another request.
/// This is also the first delay of the backoff sequence after a failed request.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Consecutive failed attempts tolerated for a single cursor before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Search expression sent with every page request.
pub const DEFAULT_SEARCH_QUERY: &str = "in:all";

/// Maximum raw length of one packed cell, in characters.
pub const DEFAULT_LENGTH_LIMIT: usize = 30_000;

/// Intermediate record file written by `fetch` and read by `pack`.
pub const DEFAULT_RECORDS_PATH: &str = "nodes-id-url.json";

/// Final single-line document.
pub const DEFAULT_OUTPUT_PATH: &str = "nodes-id-url.csv";

/// Environment variable consulted when `--api-key` is absent.
pub const API_KEY_ENV_VAR: &str = "OMNIVORE_API_KEY";

// Retry strategy
/// Factor by which the failure delay is multiplied on each consecutive attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 60;

/// User-Agent sent with API requests.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
