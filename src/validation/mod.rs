//! Validation rules for candidate setting values.
//!
//! Each rule checks one candidate and returns a [`ValidationError`] on failure.
//! [`validate_document`] runs the same rules over a whole stored document and
//! collects every finding instead of stopping at the first.

pub mod binary;
pub mod paths;
pub mod patterns;
pub mod policy;
pub mod report;
pub mod semantic;

use crate::config::model::{BlobStorageType, HashAlgorithm};
use crate::config::{ConfigStore, SettingKey};
use crate::error::ValidationError;

pub use binary::{BinaryKind, BinaryProbe, ProcessProbe};
pub use policy::{EmptyCatalog, MediaCatalog};

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// The stored value would be rejected by a mutation.
    Error,
    /// Suspicious but usable.
    Warning,
}

/// A validation issue found while checking a stored document.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Setting the issue refers to.
    pub key: SettingKey,
    /// Description of the issue.
    pub message: String,
    /// Optional suggestion for fixing the issue.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new error-level validation issue.
    pub fn error(key: SettingKey, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Error,
            key,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates a new warning-level validation issue.
    pub fn warning(key: SettingKey, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Warning,
            key,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Result of validating a stored document.
#[derive(Debug, Default)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Creates an empty validation result.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the result.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Records a rule failure as an error-level issue.
    pub fn check(&mut self, key: SettingKey, outcome: Result<(), ValidationError>) {
        if let Err(e) = outcome {
            self.add(ValidationIssue::error(key, e.to_string()));
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    pub fn is_valid(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns an iterator over error-level issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns an iterator over warning-level issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
    }

    /// Returns the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Re-runs the stateless rules over the values currently in the store.
///
/// Directory creation and binary probes are skipped; they have side effects or
/// depend on the host and only run when a value changes.
pub fn validate_document(store: &ConfigStore) -> ValidationResult {
    let mut result = ValidationResult::new();

    let database = store.get_string(SettingKey::Database);
    if !database.is_empty() {
        result.check(SettingKey::Database, paths::validate_database_path(&database));
    }

    for stash in store.get_stash_paths() {
        if !stash.path.is_dir() {
            result.add(
                ValidationIssue::warning(
                    SettingKey::Stash,
                    format!("Library path no longer exists: '{}'", stash.path.display()),
                )
                .with_suggestion("Remove the path or restore the directory"),
            );
        }
    }

    for (key, field) in [
        (SettingKey::Exclude, "video exclusion pattern"),
        (SettingKey::ImageExclude, "image/gallery exclusion pattern"),
        (SettingKey::ScraperExcludeTagPatterns, "tag exclusion pattern"),
    ] {
        result.check(key, patterns::validate_patterns(field, &store.get_string_list(key)));
    }
    result.check(
        SettingKey::GalleryCoverRegex,
        patterns::validate_pattern(
            "gallery cover regex",
            &store.get_string(SettingKey::GalleryCoverRegex),
        ),
    );

    let algorithm = HashAlgorithm::parse(&store.get_string(SettingKey::VideoFileNamingAlgorithm));
    if policy::require_md5_calculation(algorithm, store.get_bool(SettingKey::CalculateMd5)).is_err() {
        result.add(
            ValidationIssue::error(
                SettingKey::VideoFileNamingAlgorithm,
                "MD5 naming requires MD5 calculation",
            )
            .with_suggestion("Enable calculate_md5 or switch to OSHASH"),
        );
    }

    if let Some(storage) = BlobStorageType::parse(&store.get_string(SettingKey::BlobsStorage)) {
        result.check(
            SettingKey::BlobsStorage,
            policy::validate_blob_storage(storage, &store.get_string(SettingKey::BlobsPath)),
        );
    }

    result.check(
        SettingKey::StashBoxes,
        policy::validate_stash_boxes(&store.get_stash_boxes()),
    );
    result.check(
        SettingKey::LogLevel,
        semantic::validate_choice(
            SettingKey::LogLevel,
            &store.get_string(SettingKey::LogLevel),
            semantic::LOG_LEVELS,
        ),
    );

    result
}
