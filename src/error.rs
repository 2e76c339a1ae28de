//! Error types for the configuration gateway.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::SettingKey;
use crate::mutation::ChangeSet;

/// Top-level application errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration document loading and persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(String),

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid override '{0}', expected key=value")]
    InvalidOverride(String),
}

/// Failures raised by a single validation rule.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("path '{path}' does not exist")]
    PathNotFound { path: PathBuf },

    #[error("cannot create directory '{path}': {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid database path '{path}', use extension {allowed}")]
    InvalidExtension { path: PathBuf, allowed: String },

    #[error("{field} '{pattern}' invalid: {message}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        message: String,
    },

    #[error("invalid {binary} path '{path}': {message}")]
    InvalidExecutable {
        binary: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("{0}")]
    PolicyViolation(String),

    #[error("invalid value '{value}' for {key}{}", suggestion_suffix(.suggestion))]
    InvalidValue {
        key: SettingKey,
        value: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" ({})", s),
        None => String::new(),
    }
}

/// Credential hashing and token issuance errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("cannot issue an API key without a username")]
    MissingUsername,

    #[error("failed to encode token claims: {0}")]
    ClaimsEncoding(String),
}

/// Errors surfaced by a mutation handler.
#[derive(Error, Debug)]
pub enum MutationError {
    #[error("cannot set overridden value: {key}")]
    OverriddenConfig { key: SettingKey },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("media catalog query failed: {0}")]
    Catalog(anyhow::Error),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("failed to persist configuration: {0}")]
    Persistence(StoreError),

    #[error("{}", .changes.render())]
    PersistenceTolerated { changes: ChangeSet, source: StoreError },
}

impl MutationError {
    /// Returns the change set carried by a tolerated persistence failure.
    pub fn change_set(&self) -> Option<&ChangeSet> {
        match self {
            Self::PersistenceTolerated { changes, .. } => Some(changes),
            _ => None,
        }
    }
}

/// A failed mutation together with the best-effort view of the settings group.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct MutationFailure<V: std::fmt::Debug> {
    /// Current materialized view of the group after the failed call.
    pub view: V,
    /// Why the mutation failed.
    #[source]
    pub error: MutationError,
}

impl<V: std::fmt::Debug> MutationFailure<V> {
    pub fn new(view: V, error: MutationError) -> Self {
        Self { view, error }
    }
}
