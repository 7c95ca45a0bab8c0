//! Verification of an existing mirrored tree against freshly computed digests.
//!
//! Nothing is written: recorded artifacts are read back with the checksum-file
//! parser and compared with recomputed values.

use crate::error::StorageError;
use crate::progress::{DigestEvent, ProgressSink};
use crate::tree::aggregate::aggregate_directory;
use crate::tree::artifact::read_hash_from_md5_file;
use crate::tree::hasher::{digest_file, DigestOptions};
use crate::tree::path::{dir_artifact_path, file_artifact_path, map_path};
use crate::types::DigestArtifact;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::{instrument, warn};

/// Outcome of comparing a recorded artifact with a recomputed digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyStatus {
    Match,
    Mismatch {
        expected: DigestArtifact,
        actual: DigestArtifact,
    },
    /// No artifact file, or no recognizable hash inside it
    Missing,
}

impl VerifyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VerifyStatus::Match => "OK",
            VerifyStatus::Mismatch { .. } => "MISMATCH",
            VerifyStatus::Missing => "MISSING",
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, VerifyStatus::Match)
    }
}

fn recorded_digest(artifact_path: &Path) -> Result<Option<DigestArtifact>, StorageError> {
    match read_hash_from_md5_file(artifact_path) {
        Ok(found) => Ok(found),
        Err(StorageError::ArtifactReadFailure { source, .. })
            if source.kind() == io::ErrorKind::NotFound =>
        {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn compare(recorded: Option<DigestArtifact>, actual: DigestArtifact) -> VerifyStatus {
    match recorded {
        None => VerifyStatus::Missing,
        Some(expected) if expected == actual => VerifyStatus::Match,
        Some(expected) => VerifyStatus::Mismatch { expected, actual },
    }
}

fn report(path: &Path, status: &VerifyStatus, sink: &dyn ProgressSink) {
    if !status.is_match() {
        warn!(path = %path.display(), status = status.label(), "Verification difference");
    }
    sink.emit(DigestEvent::Verified {
        path: path.to_path_buf(),
        status: status.clone(),
    });
}

/// Recompute the digest of `source` and compare it with its mirrored `.md5` file.
#[instrument(skip(src_root, dest_root, options, sink), fields(path = %source.display()))]
pub fn verify_file(
    source: &Path,
    src_root: &Path,
    dest_root: &Path,
    options: &DigestOptions,
    sink: &dyn ProgressSink,
) -> Result<VerifyStatus, StorageError> {
    let result = check_file(source, src_root, dest_root, options, sink);

    match &result {
        Ok(status) => report(source, status, sink),
        Err(e) => sink.emit(DigestEvent::FileFailed {
            path: source.to_path_buf(),
            error: e.to_string(),
        }),
    }
    result
}

fn check_file(
    source: &Path,
    src_root: &Path,
    dest_root: &Path,
    options: &DigestOptions,
    sink: &dyn ProgressSink,
) -> Result<VerifyStatus, StorageError> {
    let artifact_path = file_artifact_path(&map_path(src_root, dest_root, source)?);
    let recorded = recorded_digest(&artifact_path)?;
    let actual = digest_file(source, options, sink)?;
    Ok(compare(recorded, actual))
}

/// Recompute the shallow aggregate of `dir` and compare it with `<dir>.dir.md5`.
#[instrument(skip(block_size, sink), fields(path = %dir.display()))]
pub fn verify_directory(
    dir: &Path,
    block_size: usize,
    sink: &dyn ProgressSink,
) -> Result<VerifyStatus, StorageError> {
    let result = recorded_digest(&dir_artifact_path(dir)).and_then(|recorded| {
        let actual = aggregate_directory(dir, block_size)?;
        Ok(compare(recorded, actual))
    });

    match &result {
        Ok(status) => report(dir, status, sink),
        Err(e) => sink.emit(DigestEvent::DirectoryFailed {
            path: dir.to_path_buf(),
            error: e.to_string(),
        }),
    }
    result
}
