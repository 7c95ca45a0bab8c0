//! Path mapping between the source tree and the mirrored destination tree

use crate::error::StorageError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix of a per-file artifact
pub const FILE_ARTIFACT_SUFFIX: &str = ".md5";

/// Suffix of a per-directory aggregate artifact
pub const DIR_ARTIFACT_SUFFIX: &str = ".dir.md5";

/// Canonicalize a root directory so walked paths share a stable prefix.
pub fn canonicalize_root(path: &Path) -> Result<PathBuf, StorageError> {
    dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!("Failed to canonicalize {}: {}", path.display(), e))
    })
}

/// Map a path under `source_root` onto `dest_root`.
///
/// `mirrored = dest_root + (path - source_root)`. Pure: no filesystem access and no
/// dependence on the working directory. Paths outside `source_root` are rejected.
pub fn map_path(source_root: &Path, dest_root: &Path, path: &Path) -> Result<PathBuf, StorageError> {
    let relative = path.strip_prefix(source_root).map_err(|_| {
        StorageError::InvalidPath(format!(
            "{} is not under {}",
            path.display(),
            source_root.display()
        ))
    })?;

    if relative.as_os_str().is_empty() {
        Ok(dest_root.to_path_buf())
    } else {
        Ok(dest_root.join(relative))
    }
}

/// Append `suffix` to the final component of `path` without touching its extension.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// `<mirrored>.md5`
pub fn file_artifact_path(mirrored: &Path) -> PathBuf {
    with_suffix(mirrored, FILE_ARTIFACT_SUFFIX)
}

/// `<dir>.dir.md5`, stored next to the directory inside its parent
pub fn dir_artifact_path(dir: &Path) -> PathBuf {
    with_suffix(dir, DIR_ARTIFACT_SUFFIX)
}
