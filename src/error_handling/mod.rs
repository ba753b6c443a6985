//! Error handling and fetch statistics.
//!
//! This module provides:
//! - Error type definitions for every fallible stage of a run
//! - Categorization of failed requests for the end-of-run summary
//! - The backoff strategy used between failed attempts
//!
//! Failed page requests are **errors** (retried unless fatal); responses that
//! end pagination early are **warnings**.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_status, get_retry_strategy};
pub use stats::ProcessingStats;
pub use types::{
    CredentialError, ErrorType, ExportError, FetchError, InitializationError, PageError,
    Rejection, WarningType, CREDENTIAL_ERROR_CODES,
};
