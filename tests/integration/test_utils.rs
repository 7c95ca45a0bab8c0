//! Shared test utilities for integration tests

use md5tree::pipeline::{Pipeline, RunOptions, RunSummary};
use md5tree::progress::NullSink;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Source and destination roots inside one temporary directory.
pub struct TreeFixture {
    pub temp: TempDir,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl TreeFixture {
    /// Create `source/` populated with `files` (relative path, contents) and an
    /// empty `destination/`.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let destination = temp.path().join("destination");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        for (rel, contents) in files {
            write_file(&source.join(rel), contents.as_bytes());
        }
        Self {
            temp,
            source,
            destination,
        }
    }

    pub fn run(&self, options: RunOptions) -> RunSummary {
        Pipeline::new(&self.source, &self.destination, options)
            .unwrap()
            .run(&NullSink)
            .unwrap()
    }

    pub fn artifact(&self, rel: &str) -> String {
        fs::read_to_string(self.destination.join(rel)).unwrap()
    }
}

pub fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Reference MD5 of `data`, as an artifact line.
pub fn md5_line(data: &[u8]) -> String {
    format!("{}\n", md5tree::tree::hasher::compute_content_hash(data))
}

/// Every file below `root`, relative and sorted.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
