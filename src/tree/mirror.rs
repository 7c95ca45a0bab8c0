//! Persisting per-file digests into the mirrored destination tree

use crate::error::StorageError;
use crate::progress::{DigestEvent, ProgressSink};
use crate::tree::artifact;
use crate::tree::hasher::{self, DigestOptions};
use crate::tree::path::{file_artifact_path, map_path};
use crate::types::DigestArtifact;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A source file whose digest was written to the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredFile {
    pub source: PathBuf,
    pub artifact_path: PathBuf,
    pub digest: DigestArtifact,
}

/// Digest `source` and write `<dest_root>/<relative>.md5`.
///
/// Missing mirrored parent directories are created first. The digest is computed
/// before the artifact is opened, so an unreadable source leaves no artifact behind.
/// Failures are emitted as `FileFailed` and returned; callers move on to the next file.
#[instrument(skip(src_root, dest_root, options, sink), fields(path = %source.display()))]
pub fn generate_md5_file_for(
    source: &Path,
    src_root: &Path,
    dest_root: &Path,
    options: &DigestOptions,
    sink: &dyn ProgressSink,
) -> Result<MirroredFile, StorageError> {
    let result = mirror_one(source, src_root, dest_root, options, sink);
    match &result {
        Ok(mirrored) => sink.emit(DigestEvent::FileDone {
            path: source.to_path_buf(),
            digest: mirrored.digest.clone(),
        }),
        Err(e) => sink.emit(DigestEvent::FileFailed {
            path: source.to_path_buf(),
            error: e.to_string(),
        }),
    }
    result
}

fn mirror_one(
    source: &Path,
    src_root: &Path,
    dest_root: &Path,
    options: &DigestOptions,
    sink: &dyn ProgressSink,
) -> Result<MirroredFile, StorageError> {
    let artifact_path = file_artifact_path(&map_path(src_root, dest_root, source)?);
    artifact::ensure_parent_dir(&artifact_path)?;
    let digest = hasher::digest_file(source, options, sink)?;
    artifact::write_artifact(&artifact_path, &digest)?;
    Ok(MirroredFile {
        source: source.to_path_buf(),
        artifact_path,
        digest,
    })
}
