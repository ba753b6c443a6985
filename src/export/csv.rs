//! Single-line delimited document output.

use std::path::Path;

use log::info;

use crate::error_handling::ExportError;

/// Writes the rendered document to `path`, replacing any existing file.
pub async fn write_document(path: &Path, document: &str) -> Result<(), ExportError> {
    tokio::fs::write(path, document)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "Wrote {} characters to {}",
        document.chars().count(),
        path.display()
    );
    Ok(())
}
