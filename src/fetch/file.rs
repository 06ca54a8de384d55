// src/fetch/file.rs
use crate::error::RetrievalError;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Read a local file as UTF-8 text.
#[instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub async fn read_text(path: &Path) -> Result<String, RetrievalError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| RetrievalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(bytes = text.len(), "read file");
    Ok(text)
}
