//! Bulk extraction from the paginated search API.
//!
//! This module provides:
//! - [`PageSource`], the seam between pagination and transport
//! - [`GraphqlClient`], the reqwest-backed source
//! - [`Fetcher`], the retrying cursor walk
//! - [`fetch_all`], the one-call entry point

mod client;
mod paginator;
mod query;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

pub use client::GraphqlClient;
pub use paginator::{Completion, FetchReport, Fetcher};
pub use query::SEARCH_QUERY;

use crate::config::FetchConfig;
use crate::credential::ApiKey;
use crate::error_handling::PageError;
use crate::initialization::init_client;

/// One fetched item. Keys keep the order the server sent them in.
pub type Record = Map<String, Value>;

/// An edge of a search page: a record and the cursor that resumes after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Resume point after this record
    pub cursor: String,
    /// The record itself
    pub node: Record,
}

/// A successfully decoded page response.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// The response carried an `edges` list (possibly empty).
    Edges {
        /// Records of this page with their cursors
        edges: Vec<Edge>,
        /// `pageInfo.hasNextPage`
        has_more: bool,
        /// `pageInfo.totalCount`, when reported
        total_count: Option<u64>,
    },
    /// The response had no `edges` field.
    NoEdges {
        /// Search error codes or GraphQL error messages, if any
        error_codes: Vec<String>,
    },
}

/// Something that can serve one page of search results.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Requests up to `page_size` records after `after` (`None` = start).
    async fn fetch_page(
        &self,
        after: Option<&str>,
        filter: &str,
        page_size: u32,
    ) -> Result<Page, PageError>;
}

/// Fetches every record matching `filter_expression`.
///
/// Validates `config`, builds an HTTP client with `config.timeout_seconds`
/// and runs a [`Fetcher`] against `config.endpoint`.
///
/// # Errors
///
/// Returns an error if `config` is invalid, the HTTP client cannot be built,
/// or the fetch hits a fatal condition (see [`Fetcher::run`]).
pub async fn fetch_all(
    credential: &ApiKey,
    filter_expression: &str,
    config: &FetchConfig,
) -> Result<Vec<Record>> {
    config.validate().context("Invalid fetch configuration")?;
    let http =
        init_client(config.timeout_seconds).context("Failed to initialize HTTP client")?;
    let source = GraphqlClient::new(http, config.endpoint.clone(), credential.clone());
    let report = Fetcher::new(source, config.clone(), filter_expression)
        .run()
        .await
        .context("Failed to fetch records")?;
    Ok(report.records)
}
