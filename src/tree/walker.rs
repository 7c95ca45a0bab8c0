//! Filesystem walker for traversing directory structures

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Filesystem entry types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A regular file with its path and size
    File { path: PathBuf, size: u64 },
    /// A directory with its path and depth below the walk root (root = 0)
    Directory { path: PathBuf, depth: usize },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path, .. } | Entry::Directory { path, .. } => path,
        }
    }
}

/// Filesystem walker configuration
///
/// Symbolic links are never followed and are not reported as entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Entry names to skip, matched against whole path components below the root
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Result of a walk: the entries that could be read and the per-entry failures.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub entries: Vec<Entry>,
    pub errors: Vec<StorageError>,
}

impl WalkOutput {
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e {
            Entry::File { path, .. } => Some(path.as_path()),
            Entry::Directory { .. } => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = (&Path, usize)> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Directory { path, depth } => Some((path.as_path(), *depth)),
            Entry::File { .. } => None,
        })
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect all entries below the root.
    ///
    /// Entries are sorted by path for determinism. An unreadable root is an error;
    /// unreadable entries further down are collected in [`WalkOutput::errors`] and
    /// the walk continues.
    pub fn walk(&self) -> Result<WalkOutput, StorageError> {
        let mut output = WalkOutput::default();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    if e.depth() == 0 {
                        return Err(StorageError::ReadFailure {
                            path,
                            source: e.into(),
                        });
                    }
                    debug!(path = %path.display(), "Failed to walk entry: {}", e);
                    output.errors.push(StorageError::ReadFailure {
                        path,
                        source: e.into(),
                    });
                    continue;
                }
            };

            // Skip the root directory itself (we only want its contents)
            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_file() {
                match entry.metadata() {
                    Ok(metadata) => output.entries.push(Entry::File {
                        path: entry.into_path(),
                        size: metadata.len(),
                    }),
                    Err(e) => {
                        let path = entry.into_path();
                        debug!(path = %path.display(), "Failed to read metadata: {}", e);
                        output.errors.push(StorageError::ReadFailure {
                            path,
                            source: e.into(),
                        });
                    }
                }
            } else if file_type.is_dir() {
                output.entries.push(Entry::Directory {
                    depth: entry.depth(),
                    path: entry.into_path(),
                });
            }
            // Symlinks and special files are skipped
        }

        output.entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(output)
    }

    /// Check if an entry should be ignored based on ignore patterns
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if self.config.ignore_patterns.is_empty() {
            return false;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.config
                    .ignore_patterns
                    .iter()
                    .any(|pattern| pattern.as_str() == name)
            }
            _ => false,
        })
    }
}
