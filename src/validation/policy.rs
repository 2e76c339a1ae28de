//! Cross-field policies that depend on more than one setting.

use std::collections::HashSet;

use crate::config::model::{BlobStorageType, HashAlgorithm, StashBox};
use crate::error::{MutationError, ValidationError};

/// Read-only view of the media catalog used to vet naming-algorithm changes.
#[cfg_attr(test, mockall::automock)]
pub trait MediaCatalog: Send + Sync {
    /// Counts catalogued files lacking a hash for `algorithm`.
    fn count_missing_hashes(&self, algorithm: HashAlgorithm) -> anyhow::Result<u64>;
}

/// Catalog with no entries; every algorithm change is accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCatalog;

impl MediaCatalog for EmptyCatalog {
    fn count_missing_hashes(&self, _algorithm: HashAlgorithm) -> anyhow::Result<u64> {
        Ok(0)
    }
}

/// Validates a change of the file naming algorithm.
///
/// `calculate_md5` is the resolved flag: the pending value from the same update
/// if present, otherwise the stored one.
pub fn validate_naming_algorithm(
    algorithm: HashAlgorithm,
    calculate_md5: bool,
    catalog: &dyn MediaCatalog,
) -> Result<(), MutationError> {
    require_md5_calculation(Some(algorithm), calculate_md5)?;

    let missing = catalog
        .count_missing_hashes(algorithm)
        .map_err(MutationError::Catalog)?;
    if missing > 0 {
        return Err(ValidationError::PolicyViolation(format!(
            "{} file(s) are missing a {} hash; run a scan that generates it before switching",
            missing, algorithm
        ))
        .into());
    }

    Ok(())
}

/// MD5 file naming only works while MD5 hashes are being calculated.
pub fn require_md5_calculation(
    algorithm: Option<HashAlgorithm>,
    calculate_md5: bool,
) -> Result<(), ValidationError> {
    if algorithm == Some(HashAlgorithm::Md5) && !calculate_md5 {
        return Err(ValidationError::PolicyViolation(
            "calculateMD5 must be true if using MD5".to_string(),
        ));
    }
    Ok(())
}

/// Filesystem blob storage needs a place to put the blobs.
pub fn validate_blob_storage(
    storage: BlobStorageType,
    blobs_path: &str,
) -> Result<(), ValidationError> {
    if storage == BlobStorageType::Filesystem && blobs_path.is_empty() {
        return Err(ValidationError::PolicyViolation(
            "blobs path must be set when using filesystem storage".to_string(),
        ));
    }
    Ok(())
}

/// Validates metadata server entries: endpoint and key required, endpoints unique.
pub fn validate_stash_boxes(boxes: &[StashBox]) -> Result<(), ValidationError> {
    let mut endpoints = HashSet::new();

    for (i, stash_box) in boxes.iter().enumerate() {
        if stash_box.endpoint.trim().is_empty() {
            return Err(ValidationError::PolicyViolation(format!(
                "stash-box {} is missing an endpoint",
                i
            )));
        }
        if stash_box.api_key.trim().is_empty() {
            return Err(ValidationError::PolicyViolation(format!(
                "stash-box '{}' is missing an API key",
                stash_box.endpoint
            )));
        }
        if !endpoints.insert(stash_box.endpoint.trim()) {
            return Err(ValidationError::PolicyViolation(format!(
                "stash-box endpoint '{}' is used more than once",
                stash_box.endpoint
            )));
        }
    }

    Ok(())
}
