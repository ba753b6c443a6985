//! Error categorization and retry strategy.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::ErrorType;

/// Creates the backoff used between failed attempts at the same cursor.
///
/// The first delay equals `initial`, each following delay doubles
/// (`RETRY_FACTOR`), and no delay exceeds `RETRY_MAX_DELAY_SECS`.
///
/// `ExponentialBackoff` raises its base to the attempt number, so the base
/// carries the growth factor and `factor` carries the scale.
pub fn get_retry_strategy(initial: Duration) -> ExponentialBackoff {
    let factor = crate::config::RETRY_FACTOR;
    let initial_ms = u64::try_from(initial.as_millis()).unwrap_or(u64::MAX);
    ExponentialBackoff::from_millis(factor)
        .factor((initial_ms / factor).max(1))
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
}

/// Categorizes an HTTP status code into an `ErrorType`.
pub fn categorize_status(status: u16) -> ErrorType {
    match status {
        401 | 403 => ErrorType::HttpRequestUnauthorized,
        429 => ErrorType::HttpRequestTooManyRequests,
        400..=499 => ErrorType::HttpRequestClientError,
        500..=599 => ErrorType::HttpRequestServerError,
        _ => ErrorType::HttpRequestOtherError,
    }
}

/// Categorizes a `reqwest::Error` into an `ErrorType`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        return categorize_status(status.as_u16());
    }

    if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_retry_strategy_initial_delay() {
        let first_delay = get_retry_strategy(Duration::from_millis(1000))
            .next()
            .unwrap();
        assert_eq!(first_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_get_retry_strategy_doubles() {
        let delays: Vec<Duration> = get_retry_strategy(Duration::from_millis(100))
            .take(4)
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
            ]
        );
    }

    #[test]
    fn test_get_retry_strategy_max_delay() {
        let max_delay_ms = (crate::config::RETRY_MAX_DELAY_SECS * 1000) as u128;
        for delay in get_retry_strategy(Duration::from_millis(1000)).take(40) {
            assert!(
                delay.as_millis() <= max_delay_ms,
                "Delay {}ms exceeds max {}ms",
                delay.as_millis(),
                max_delay_ms
            );
        }
    }

    #[test]
    fn test_get_retry_strategy_tiny_initial_delay() {
        // Sub-factor delays still produce a growing, non-zero sequence
        let delays: Vec<Duration> = get_retry_strategy(Duration::from_millis(1))
            .take(3)
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(2),
                Duration::from_millis(4),
                Duration::from_millis(8),
            ]
        );
    }

    #[test]
    fn test_categorize_status() {
        assert_eq!(categorize_status(401), ErrorType::HttpRequestUnauthorized);
        assert_eq!(categorize_status(403), ErrorType::HttpRequestUnauthorized);
        assert_eq!(categorize_status(429), ErrorType::HttpRequestTooManyRequests);
        assert_eq!(categorize_status(400), ErrorType::HttpRequestClientError);
        assert_eq!(categorize_status(502), ErrorType::HttpRequestServerError);
        assert_eq!(categorize_status(302), ErrorType::HttpRequestOtherError);
    }

    // Categorizing real reqwest::Error instances needs a live connection;
    // tests/fetch_integration.rs covers that path through the mock server.
}
