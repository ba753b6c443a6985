//! Cursor pagination state machine.
//!
//! The cursor for the next request is always the cursor of the last edge
//! consumed, never a server-supplied "next" token. A page that carries no
//! edges therefore cannot advance the cursor and ends the walk.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_util::sync::CancellationToken;

use super::{Page, PageSource, Record};
use crate::app::log_progress;
use crate::config::FetchConfig;
use crate::error_handling::{
    get_retry_strategy, FetchError, PageError, ProcessingStats, Rejection, WarningType,
};

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The last page reported `hasNextPage: false`.
    Exhausted,
    /// A response carried no `edges` field.
    NoEdges,
    /// A page carried an empty `edges` list. `advertised_more` records whether
    /// the server claimed further pages anyway.
    EmptyPage {
        /// Value of `hasNextPage` on the empty page
        advertised_more: bool,
    },
}

/// Outcome of a completed fetch.
#[derive(Debug)]
pub struct FetchReport {
    /// Every record received, in arrival order
    pub records: Vec<Record>,
    /// Successful page requests
    pub pages: usize,
    /// Failed attempts that were retried
    pub failed_attempts: usize,
    /// Last `totalCount` the server reported
    pub total_count: Option<u64>,
    /// Why the walk ended
    pub completion: Completion,
    /// Wall-clock duration in seconds
    pub elapsed_seconds: f64,
}

enum FetchState {
    Fetching {
        cursor: Option<String>,
        failures: u32,
    },
    Done(Completion),
}

#[derive(Default)]
struct Progress {
    records: Vec<Record>,
    pages: usize,
    failed_attempts: usize,
    total_count: Option<u64>,
}

/// Walks a [`PageSource`] to exhaustion.
pub struct Fetcher<S> {
    source: S,
    config: FetchConfig,
    filter: String,
    cancel: Option<CancellationToken>,
    stats: ProcessingStats,
}

impl<S: PageSource> Fetcher<S> {
    /// Creates a fetcher for `filter` over `source`.
    pub fn new(source: S, config: FetchConfig, filter: impl Into<String>) -> Self {
        Self {
            source,
            config,
            filter: filter.into(),
            cancel: None,
            stats: ProcessingStats::new(),
        }
    }

    /// Stops the walk at the next request or delay once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Failure and warning counters of the latest [`run`](Self::run).
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Fetches every page.
    ///
    /// Transient failures are retried at the same cursor with exponential
    /// backoff starting at `retry_delay`, so no page is ever skipped.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Unauthorized`] when the API rejects the credential,
    ///   by HTTP status or by an `UNAUTHORIZED`/`FORBIDDEN` search error code
    /// - [`FetchError::RetriesExhausted`] when one cursor fails more than
    ///   `max_retries` times in a row
    /// - [`FetchError::Cancelled`] when the cancellation token fires
    pub async fn run(&self) -> Result<FetchReport, FetchError> {
        let start = Instant::now();
        self.stats.reset();
        let mut progress = Progress::default();
        let mut backoff = get_retry_strategy(self.config.retry_delay);
        let mut state = FetchState::Fetching {
            cursor: None,
            failures: 0,
        };

        let completion = loop {
            state = match state {
                FetchState::Done(completion) => break completion,
                FetchState::Fetching { cursor, failures } => {
                    if self.is_cancelled() {
                        return Err(FetchError::Cancelled {
                            fetched: progress.records.len(),
                        });
                    }

                    let outcome = self
                        .source
                        .fetch_page(cursor.as_deref(), &self.filter, self.config.page_size)
                        .await;

                    match outcome {
                        Ok(page) => {
                            progress.pages += 1;
                            backoff = get_retry_strategy(self.config.retry_delay);
                            let next = self.absorb(page, cursor, &mut progress, start)?;
                            if matches!(next, FetchState::Fetching { .. }) {
                                self.pause(self.config.retry_delay, &progress).await?;
                            }
                            next
                        }
                        Err(error) => {
                            self.stats.increment_error(error.error_type());
                            self.on_failure(error, cursor, failures, &mut backoff, &mut progress)
                                .await?
                        }
                    }
                }
            };
        };

        let elapsed_seconds = start.elapsed().as_secs_f64();
        info!(
            "Fetched {} records in {} pages ({} failed attempts) in {:.1}s",
            progress.records.len(),
            progress.pages,
            progress.failed_attempts,
            elapsed_seconds
        );

        Ok(FetchReport {
            records: progress.records,
            pages: progress.pages,
            failed_attempts: progress.failed_attempts,
            total_count: progress.total_count,
            completion,
            elapsed_seconds,
        })
    }

    fn absorb(
        &self,
        page: Page,
        cursor: Option<String>,
        progress: &mut Progress,
        start: Instant,
    ) -> Result<FetchState, FetchError> {
        match page {
            Page::NoEdges { error_codes } => {
                if let Some(rejection) = Rejection::from_error_codes(&error_codes) {
                    return Err(FetchError::Unauthorized { rejection });
                }
                if error_codes.is_empty() {
                    info!("Response carried no edges; treating as end of collection");
                    self.stats.increment_warning(WarningType::MissingEdges);
                } else {
                    warn!(
                        "Search returned {:?} instead of edges; treating as end of collection",
                        error_codes
                    );
                    self.stats.increment_warning(WarningType::SearchErrorCodes);
                }
                Ok(FetchState::Done(Completion::NoEdges))
            }
            Page::Edges {
                edges,
                has_more,
                total_count,
            } => {
                if total_count.is_some() {
                    progress.total_count = total_count;
                }

                let Some(last_cursor) = edges.last().map(|edge| edge.cursor.clone()) else {
                    if has_more {
                        warn!(
                            "Server reported more pages but returned an empty page after cursor {:?}; stopping with {} records",
                            cursor,
                            progress.records.len()
                        );
                        self.stats.increment_warning(WarningType::EmptyPageWithMore);
                    } else {
                        debug!("Empty final page");
                    }
                    return Ok(FetchState::Done(Completion::EmptyPage {
                        advertised_more: has_more,
                    }));
                };

                progress.records.extend(edges.into_iter().map(|edge| edge.node));
                log_progress(start, progress.records.len(), progress.total_count);

                if has_more {
                    Ok(FetchState::Fetching {
                        cursor: Some(last_cursor),
                        failures: 0,
                    })
                } else {
                    Ok(FetchState::Done(Completion::Exhausted))
                }
            }
        }
    }

    async fn on_failure(
        &self,
        error: PageError,
        cursor: Option<String>,
        failures: u32,
        backoff: &mut ExponentialBackoff,
        progress: &mut Progress,
    ) -> Result<FetchState, FetchError> {
        if let Some(status) = error.rejected_status() {
            return Err(FetchError::Unauthorized {
                rejection: Rejection::Status(status),
            });
        }

        progress.failed_attempts += 1;
        let failures = failures + 1;

        if let Some(max_retries) = self.config.max_retries {
            if failures > max_retries {
                return Err(FetchError::RetriesExhausted {
                    cursor,
                    attempts: failures,
                    fetched: progress.records.len(),
                    last_error: error,
                });
            }
        }

        let delay = backoff.next().unwrap_or(self.config.retry_delay);
        warn!(
            "Page request after cursor {:?} failed (attempt {}): {}; retrying in {:?}",
            cursor, failures, error, delay
        );
        self.pause(delay, progress).await?;

        Ok(FetchState::Fetching { cursor, failures })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    async fn pause(&self, delay: Duration, progress: &Progress) -> Result<(), FetchError> {
        let cancelled = FetchError::Cancelled {
            fetched: progress.records.len(),
        };
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(cancelled),
                _ = tokio::time::sleep(delay) => Ok(()),
            },
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}
