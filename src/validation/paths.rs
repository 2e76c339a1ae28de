//! Path validation for storage directories and library roots.

use std::path::Path;

use crate::config::model::StashPath;
use crate::error::ValidationError;

/// Allowed database file extensions.
pub const DATABASE_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

/// Validates that a directory exists.
pub fn require_existing_dir(path: &Path) -> Result<(), ValidationError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ValidationError::PathNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Ensures a directory exists, creating it and its parents if needed.
pub fn ensure_directory(path: &Path) -> Result<(), ValidationError> {
    std::fs::create_dir_all(path).map_err(|e| ValidationError::DirectoryCreateFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validates that a database path uses a known extension.
pub fn validate_database_path(path: &str) -> Result<(), ValidationError> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if DATABASE_EXTENSIONS.contains(&extension) {
        Ok(())
    } else {
        Err(ValidationError::InvalidExtension {
            path: path.into(),
            allowed: DATABASE_EXTENSIONS.join(", "),
        })
    }
}

/// Validates library roots, checking existence only for paths not already configured.
///
/// Known paths are trusted even if they have since disappeared from disk.
pub fn validate_stash_paths(
    existing: &[StashPath],
    candidate: &[StashPath],
) -> Result<(), ValidationError> {
    for stash in candidate {
        let is_new = !existing.iter().any(|known| known.path == stash.path);
        if is_new {
            require_existing_dir(&stash.path)?;
        }
    }
    Ok(())
}
