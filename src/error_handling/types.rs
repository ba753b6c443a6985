//! Error type definitions.
//!
//! This module defines all error types used throughout the application:
//! - Initialization errors (logger, HTTP client)
//! - Per-request page errors and the fetcher's fatal errors
//! - Credential and export (file) errors
//! - Error/warning categories tracked by [`ProcessingStats`](super::ProcessingStats)

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::credential::CredentialSource;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure of a single page request.
///
/// All variants except a rejected credential are transient: the fetcher keeps
/// its cursor and asks for the same page again.
#[derive(Error, Debug)]
pub enum PageError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] ReqwestError),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code returned by the server
        status: u16,
        /// Leading part of the response body
        body: String,
    },

    /// Body was not a JSON document of the expected shape.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PageError {
    /// The 401/403 status when the request failed on a rejected credential.
    ///
    /// Only such a rejection is fatal; rate limiting, server errors, other
    /// statuses and malformed bodies are all retried.
    pub fn rejected_status(&self) -> Option<u16> {
        match self {
            PageError::Status {
                status: status @ (401 | 403),
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same request can never succeed.
    pub fn is_fatal(&self) -> bool {
        self.rejected_status().is_some()
    }

    /// Category used for end-of-run statistics.
    pub fn error_type(&self) -> ErrorType {
        match self {
            PageError::Http(e) => super::categorize_reqwest_error(e),
            PageError::Status { status, .. } => super::categorize_status(*status),
            PageError::Decode(_) => ErrorType::ResponseDecodeError,
        }
    }
}

/// Search error codes that mean the credential was refused.
pub const CREDENTIAL_ERROR_CODES: [&str; 2] = ["UNAUTHORIZED", "FORBIDDEN"];

/// How the API refused a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// HTTP 401 or 403
    Status(u16),
    /// A `SearchError` code such as `UNAUTHORIZED` in a 200 response
    ErrorCode(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Status(status) => write!(f, "HTTP {status}"),
            Rejection::ErrorCode(code) => write!(f, "error code {code}"),
        }
    }
}

impl Rejection {
    /// The first credential error code among `codes`, if any.
    pub fn from_error_codes(codes: &[String]) -> Option<Self> {
        codes
            .iter()
            .find(|code| CREDENTIAL_ERROR_CODES.contains(&code.to_ascii_uppercase().as_str()))
            .map(|code| Rejection::ErrorCode(code.clone()))
    }
}

/// Fatal fetch outcomes. Anything else is retried or treated as end of data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The API refused the credential.
    #[error("API rejected the credential ({rejection})")]
    Unauthorized {
        /// How the refusal was signalled
        rejection: Rejection,
    },

    /// The retry ceiling was reached for one cursor.
    #[error(
        "gave up after {attempts} failed attempts at cursor {} ({fetched} records fetched before the failure)",
        cursor.as_deref().unwrap_or("<start>")
    )]
    RetriesExhausted {
        /// Cursor whose page could not be fetched
        cursor: Option<String>,
        /// Consecutive failed attempts
        attempts: u32,
        /// Records accumulated before giving up
        fetched: usize,
        /// Last failure observed
        #[source]
        last_error: PageError,
    },

    /// The caller's cancellation token fired.
    #[error("fetch cancelled after {fetched} records")]
    Cancelled {
        /// Records accumulated before cancellation
        fetched: usize,
    },
}

/// Credential resolution failures.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// A non-interactive source supplied a malformed key.
    #[error("API key from {origin} is malformed (expected 8-4-4-4-12 hexadecimal groups)")]
    Invalid {
        /// Where the key came from
        origin: CredentialSource,
    },

    /// Standard input closed before a valid key was entered.
    #[error("no API key entered")]
    PromptClosed,

    /// Reading from or writing to the terminal failed.
    #[error("failed to prompt for API key: {0}")]
    Prompt(#[from] std::io::Error),
}

/// File read/write failures. Always fatal; never retried.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Input file missing or unreadable.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Input file is not a JSON array of objects.
    #[error("failed to parse records in {}: {source}", path.display())]
    Parse {
        /// File that could not be parsed
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Records could not be serialized.
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Categories of failed page requests.
///
/// Each variant counts one failed attempt; tracked for the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRequestError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    HttpRequestUnauthorized,
    HttpRequestTooManyRequests,
    HttpRequestClientError,
    HttpRequestServerError,
    ResponseDecodeError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestUnauthorized => "Unauthorized",
            ErrorType::HttpRequestTooManyRequests => "Too many requests",
            ErrorType::HttpRequestClientError => "HTTP client error status",
            ErrorType::HttpRequestServerError => "HTTP server error status",
            ErrorType::ResponseDecodeError => "Malformed response body",
        }
    }
}

/// Notable responses that end pagination without being failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// `hasNextPage` was true but the page carried no edges.
    EmptyPageWithMore,
    /// The search returned error codes instead of edges.
    SearchErrorCodes,
    /// The response had no `edges` field at all.
    MissingEdges,
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::EmptyPageWithMore => "Empty page while more were advertised",
            WarningType::SearchErrorCodes => "Search returned error codes",
            WarningType::MissingEdges => "Response without edges",
        }
    }
}
