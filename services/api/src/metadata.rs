//! services/api/src/metadata.rs
//!
//! Reads the `[meta]` table of the project's TOML metadata file.

use std::path::{Path, PathBuf};

/// Why the metadata could not be served.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("{} file not found", file_name(.0))]
    NotFound(PathBuf),
    #[error("Missing [meta] section in {}", file_name(.0))]
    MissingSection(PathBuf),
    #[error("Failed to read metadata from {}: {1}", file_name(.0))]
    Unreadable(PathBuf, String),
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Loads the `[meta]` table from `path` and converts it to JSON.
///
/// The file is read on every call so edits show up without a restart.
pub async fn load_meta(path: &Path) -> Result<serde_json::Value, MetadataError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MetadataError::NotFound(path.to_path_buf())
        } else {
            MetadataError::Unreadable(path.to_path_buf(), e.to_string())
        }
    })?;

    let mut document: toml::Table = toml::from_str(&content)
        .map_err(|e| MetadataError::Unreadable(path.to_path_buf(), e.to_string()))?;

    let meta = document
        .remove("meta")
        .ok_or_else(|| MetadataError::MissingSection(path.to_path_buf()))?;

    serde_json::to_value(meta)
        .map_err(|e| MetadataError::Unreadable(path.to_path_buf(), e.to_string()))
}
