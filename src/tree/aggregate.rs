//! Per-directory aggregate digests.
//!
//! A directory's aggregate covers only its immediate file children: their contents
//! are streamed, in byte-wise name order, into one MD5 accumulator. Subdirectories
//! contribute nothing directly; any `<sub>.dir.md5` file already sitting in the
//! directory is an ordinary file and is included like any other.

use crate::error::StorageError;
use crate::progress::{DigestEvent, ProgressSink};
use crate::tree::artifact;
use crate::tree::hasher;
use crate::tree::path::dir_artifact_path;
use crate::types::DigestArtifact;
use md5::{Digest, Md5};
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// An immediate file child of a directory being aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildFile {
    pub name: OsString,
    pub size: u64,
}

/// A directory and its sorted immediate file children. Lives for one aggregation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryAggregateRecord {
    pub path: PathBuf,
    pub children: Vec<ChildFile>,
}

impl DirectoryAggregateRecord {
    /// Enumerate the regular files directly inside `dir`, sorted by name.
    ///
    /// Subdirectories and symlinks are not children.
    pub fn collect(dir: &Path) -> Result<Self, StorageError> {
        let read_failure = |source: std::io::Error| StorageError::ReadFailure {
            path: dir.to_path_buf(),
            source,
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_failure)? {
            let entry = entry.map_err(read_failure)?;
            let file_type = entry.file_type().map_err(read_failure)?;
            if !file_type.is_file() {
                continue;
            }
            let metadata = entry.metadata().map_err(|source| StorageError::ReadFailure {
                path: entry.path(),
                source,
            })?;
            children.push(ChildFile {
                name: entry.file_name(),
                size: metadata.len(),
            });
        }

        Ok(Self::from_children(dir.to_path_buf(), children))
    }

    /// Build a record from children in any order; they are sorted here.
    pub fn from_children(path: PathBuf, mut children: Vec<ChildFile>) -> Self {
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Self { path, children }
    }

    /// Children that contribute to the aggregate (zero-byte files are skipped).
    pub fn contributing(&self) -> impl Iterator<Item = &ChildFile> {
        self.children.iter().filter(|child| child.size > 0)
    }

    /// Stream every contributing child into one accumulator.
    pub fn digest(&self, block_size: usize) -> Result<DigestArtifact, StorageError> {
        let mut hasher = Md5::new();
        let mut buf = vec![0u8; block_size.max(1)];
        for child in self.contributing() {
            let child_path = self.path.join(&child.name);
            let read_failure = |source: std::io::Error| StorageError::ReadFailure {
                path: child_path.clone(),
                source,
            };
            let mut file = File::open(&child_path).map_err(read_failure)?;
            hasher::update_from_reader(&mut hasher, &mut file, &mut buf, |_, _| {})
                .map_err(read_failure)?;
        }
        Ok(hasher::finalize(hasher))
    }
}

/// Compute the shallow aggregate digest of `dir` without persisting it.
pub fn aggregate_directory(dir: &Path, block_size: usize) -> Result<DigestArtifact, StorageError> {
    DirectoryAggregateRecord::collect(dir)?.digest(block_size)
}

/// Compute the aggregate of `dir` and write it to `<dir>.dir.md5`.
#[instrument(skip(block_size, sink), fields(path = %dir.display()))]
pub fn propagate_directory(
    dir: &Path,
    block_size: usize,
    sink: &dyn ProgressSink,
) -> Result<DigestArtifact, StorageError> {
    let result = aggregate_directory(dir, block_size).and_then(|digest| {
        artifact::write_artifact(&dir_artifact_path(dir), &digest)?;
        Ok(digest)
    });

    match &result {
        Ok(digest) => {
            debug!(digest = %digest, "Aggregated directory");
            sink.emit(DigestEvent::DirectoryDone {
                path: dir.to_path_buf(),
                digest: digest.clone(),
            });
        }
        Err(e) => sink.emit(DigestEvent::DirectoryFailed {
            path: dir.to_path_buf(),
            error: e.to_string(),
        }),
    }
    result
}
