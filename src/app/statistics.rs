//! End-of-run statistics.

use log::{info, warn};
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats, WarningType};

/// Logs every non-zero failure and warning counter.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total_errors = stats.total_errors();
    let total_warnings = stats.total_warnings();

    if total_errors == 0 && total_warnings == 0 {
        info!("No failed requests");
        return;
    }

    if total_errors > 0 {
        warn!("Failed requests (all retried): {}", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                warn!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    for warning_type in WarningType::iter() {
        let count = stats.get_warning_count(warning_type);
        if count > 0 {
            warn!("{}: {}", warning_type.as_str(), count);
        }
    }
}
