//! Reading and writing single-line checksum files.

use crate::error::StorageError;
use crate::types::{DigestArtifact, HASH_HEX_LEN};
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Create the parent directory of `path` if it does not exist yet.
///
/// Safe to call concurrently for the same parent; an existing directory is success.
pub fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|source| StorageError::DirectoryCreateFailure {
        path: parent.to_path_buf(),
        source,
    })
}

/// Write `<digest>\n` to `path`, replacing any previous content.
pub fn write_artifact(path: &Path, digest: &DigestArtifact) -> Result<(), StorageError> {
    fs::write(path, digest.to_artifact_line()).map_err(|source| {
        StorageError::ArtifactWriteFailure {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), digest = %digest, "Wrote checksum file");
    Ok(())
}

/// Extract a hash from one line of a checksum listing.
///
/// Accepts a bare 32-hex line, or `<hash>*<anything>` where the hash precedes the
/// first `*`. Comment (`;`) and blank lines yield nothing.
pub fn parse_md5_line(line: &str) -> Option<DigestArtifact> {
    let trimmed = line.trim_end();
    if trimmed.len() == HASH_HEX_LEN {
        if let Ok(digest) = DigestArtifact::parse(trimmed) {
            return Some(digest);
        }
    }
    if trimmed.is_empty() || line.starts_with(';') {
        return None;
    }
    let (prefix, _) = line.split_once('*')?;
    let candidate = prefix.trim();
    if candidate.len() == HASH_HEX_LEN {
        DigestArtifact::parse(candidate).ok()
    } else {
        None
    }
}

/// First hash found in a checksum listing, scanning line by line.
pub fn parse_md5_listing<R: BufRead>(reader: R) -> io::Result<Option<DigestArtifact>> {
    for line in reader.lines() {
        if let Some(digest) = parse_md5_line(&line?) {
            return Ok(Some(digest));
        }
    }
    Ok(None)
}

/// Read the hash out of a `.md5` file.
///
/// Returns `Ok(None)` when the file exists but holds no recognizable hash.
pub fn read_hash_from_md5_file(path: &Path) -> Result<Option<DigestArtifact>, StorageError> {
    let read_failure = |source: io::Error| StorageError::ArtifactReadFailure {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(read_failure)?;
    parse_md5_listing(BufReader::new(file)).map_err(read_failure)
}
