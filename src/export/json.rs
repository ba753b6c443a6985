//! Intermediate record file.
//!
//! A pretty-printed JSON array of record objects, written wholesale. The file
//! is the hand-off between `fetch` and `pack` when they run separately.

use std::path::Path;

use log::info;

use crate::error_handling::ExportError;
use crate::fetch::Record;

/// Writes `records` as a pretty-printed JSON array, replacing `path`.
pub async fn write_records(path: &Path, records: &[Record]) -> Result<(), ExportError> {
    let mut body = serde_json::to_string_pretty(records)?;
    body.push('\n');
    tokio::fs::write(path, body)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a JSON array of record objects.
///
/// # Errors
///
/// [`ExportError::Read`] when the file is missing or unreadable,
/// [`ExportError::Parse`] when it is not an array of objects.
pub async fn read_records(path: &Path) -> Result<Vec<Record>, ExportError> {
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ExportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let records: Vec<Record> =
        serde_json::from_str(&body).map_err(|source| ExportError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
