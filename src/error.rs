//! Error types for the md5tree checksum pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-entity storage errors.
///
/// Every variant that concerns a single file or directory carries its path so the
/// pipeline can report the failure and move on to the next entity.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("can't read file {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't create directory {}: {source}", path.display())]
    DirectoryCreateFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't write to file {}: {source}", path.display())]
    ArtifactWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't read checksum file {}: {source}", path.display())]
    ArtifactReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid digest artifact: {0:?}")]
    InvalidArtifact(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    /// Short stable name of the failure category, used in run summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::ReadFailure { .. } => "read_failure",
            StorageError::DirectoryCreateFailure { .. } => "directory_create_failure",
            StorageError::ArtifactWriteFailure { .. } => "artifact_write_failure",
            StorageError::ArtifactReadFailure { .. } => "artifact_read_failure",
            StorageError::InvalidArtifact(_) => "invalid_artifact",
            StorageError::InvalidPath(_) => "invalid_path",
            StorageError::IoError(_) => "io_error",
        }
    }

    /// Path of the file or directory the failure concerns, when known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StorageError::ReadFailure { path, .. }
            | StorageError::DirectoryCreateFailure { path, .. }
            | StorageError::ArtifactWriteFailure { path, .. }
            | StorageError::ArtifactReadFailure { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Run-level errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Verification failed: {mismatched} mismatched, {missing} missing")]
    VerificationFailed { mismatched: usize, missing: usize },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
