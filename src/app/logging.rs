//! Progress logging utilities.

use log::info;
use std::time::Instant;

/// Logs how many records have been fetched so far.
///
/// Includes a percentage when the server reported a total.
pub fn log_progress(start_time: Instant, fetched: usize, total: Option<u64>) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    match progress_fraction(fetched, total) {
        Some(fraction) => info!(
            "Fetched {} of {} records ({:.1}%) in {:.1}s",
            fetched,
            total.unwrap_or_default(),
            fraction * 100.0,
            elapsed_secs
        ),
        None => info!("Fetched {} records in {:.1}s", fetched, elapsed_secs),
    }
}

/// `fetched / total`, or `None` when the total is unknown or zero.
pub fn progress_fraction(fetched: usize, total: Option<u64>) -> Option<f64> {
    match total {
        Some(total) if total > 0 => Some(fetched as f64 / total as f64),
        _ => None,
    }
}
