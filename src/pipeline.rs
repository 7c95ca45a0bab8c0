//! Two-phase checksum pipeline.
//!
//! Phase 1 walks the source tree and mirrors one `.md5` artifact per file into the
//! destination tree. Phase 2 walks the destination tree and writes a `.dir.md5`
//! aggregate for every directory below the destination root.
//!
//! Phase 2 starts only after phase 1 has finished. Within phase 2, directories are
//! processed one depth level at a time, deepest first, so a directory is aggregated
//! only after every subdirectory has written its `.dir.md5` into it. Work inside a
//! level (and all of phase 1) has no shared mutable state and may run on a rayon pool.

use crate::error::{ApiError, StorageError};
use crate::progress::{DigestEvent, Phase, ProgressSink};
use crate::tree::aggregate::propagate_directory;
use crate::tree::hasher::DigestOptions;
use crate::tree::mirror::generate_md5_file_for;
use crate::tree::path::canonicalize_root;
use crate::tree::walker::{WalkOutput, Walker, WalkerConfig};
use crate::verify::{verify_directory, verify_file, VerifyStatus};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// What the pipeline does with the digests it computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Write `.md5` and `.dir.md5` artifacts
    #[default]
    Generate,
    /// Compare recomputed digests with existing artifacts; write nothing
    Verify,
}

/// Pipeline options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: RunMode,
    pub digest: DigestOptions,
    /// Worker threads. 1 = strictly sequential, 0 = one per CPU.
    pub jobs: usize,
    pub walker: WalkerConfig,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Generate,
            digest: DigestOptions::default(),
            jobs: 1,
            walker: WalkerConfig::default(),
        }
    }
}

/// One file or directory that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub path: PathBuf,
    pub kind: String,
    pub message: String,
}

impl Failure {
    fn from_error(err: &StorageError, entity: &Path) -> Self {
        Self {
            path: err.path().unwrap_or(entity).to_path_buf(),
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub files_digested: usize,
    pub files_failed: usize,
    pub directories_aggregated: usize,
    pub directories_failed: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub missing: usize,
    pub failures: Vec<Failure>,
    pub duration_ms: u64,
}

impl RunSummary {
    /// Whether verification found any difference. Always false in generate mode.
    pub fn has_differences(&self) -> bool {
        self.mismatched > 0 || self.missing > 0
    }

    fn record_verify(&mut self, status: &VerifyStatus) {
        match status {
            VerifyStatus::Match => self.matched += 1,
            VerifyStatus::Mismatch { .. } => self.mismatched += 1,
            VerifyStatus::Missing => self.missing += 1,
        }
    }
}

/// Which side of the pipeline an entity belongs to, for tallying.
#[derive(Clone, Copy)]
enum Tally {
    File,
    Directory,
}

/// Source/destination pair plus options, ready to run.
pub struct Pipeline {
    source_root: PathBuf,
    dest_root: PathBuf,
    options: RunOptions,
}

impl Pipeline {
    /// Validate both roots and the options.
    ///
    /// Roots must be existing directories; they are canonicalized so that walked paths
    /// map cleanly from one tree to the other.
    pub fn new(source_root: &Path, dest_root: &Path, options: RunOptions) -> Result<Self, ApiError> {
        options.digest.validate().map_err(ApiError::InvalidArgument)?;
        Ok(Self {
            source_root: require_directory(source_root)?,
            dest_root: require_directory(dest_root)?,
            options,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Run both phases to completion.
    ///
    /// Per-file and per-directory failures are reported through `sink`, collected in
    /// the summary and never abort the run. Only an unreadable root or an unusable
    /// thread pool is fatal.
    #[instrument(skip(self, sink), fields(source = %self.source_root.display(), destination = %self.dest_root.display()))]
    pub fn run(&self, sink: &dyn ProgressSink) -> Result<RunSummary, ApiError> {
        let start = Instant::now();
        info!(mode = ?self.options.mode, jobs = self.options.jobs, "Starting checksum run");

        let pool = self.thread_pool()?;
        let mut summary = RunSummary {
            mode: self.options.mode,
            source_root: self.source_root.clone(),
            destination_root: self.dest_root.clone(),
            ..RunSummary::default()
        };

        sink.emit(DigestEvent::PhaseStarted {
            phase: Phase::Mirror,
        });
        self.mirror_phase(pool.as_ref(), sink, &mut summary)?;

        sink.emit(DigestEvent::PhaseStarted {
            phase: Phase::Aggregate,
        });
        self.aggregate_phase(pool.as_ref(), sink, &mut summary)?;

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            files = summary.files_digested,
            files_failed = summary.files_failed,
            directories = summary.directories_aggregated,
            directories_failed = summary.directories_failed,
            duration_ms = summary.duration_ms,
            "Checksum run completed"
        );
        Ok(summary)
    }

    fn mirror_phase(
        &self,
        pool: Option<&ThreadPool>,
        sink: &dyn ProgressSink,
        summary: &mut RunSummary,
    ) -> Result<(), ApiError> {
        let walk = self.walk(&self.source_root)?;
        record_walk_errors(&walk, Tally::File, sink, summary);

        let files: Vec<PathBuf> = walk.files().map(Path::to_path_buf).collect();
        debug!(file_count = files.len(), "Walked source tree");

        let (src, dest, digest) = (&self.source_root, &self.dest_root, &self.options.digest);
        match self.options.mode {
            RunMode::Generate => {
                let results = run_tasks(pool, &files, |file| {
                    generate_md5_file_for(file, src, dest, digest, sink).map(|_| None)
                });
                tally(&files, results, Tally::File, summary);
            }
            RunMode::Verify => {
                let results = run_tasks(pool, &files, |file| {
                    verify_file(file, src, dest, digest, sink).map(Some)
                });
                tally(&files, results, Tally::File, summary);
            }
        }
        Ok(())
    }

    fn aggregate_phase(
        &self,
        pool: Option<&ThreadPool>,
        sink: &dyn ProgressSink,
        summary: &mut RunSummary,
    ) -> Result<(), ApiError> {
        let walk = self.walk(&self.dest_root)?;
        record_walk_errors(&walk, Tally::Directory, sink, summary);

        let block_size = self.options.digest.block_size;
        for (depth, dirs) in directory_levels(&walk).into_iter().rev() {
            debug!(depth, directory_count = dirs.len(), "Aggregating directory level");
            let results = match self.options.mode {
                RunMode::Generate => run_tasks(pool, &dirs, |dir| {
                    propagate_directory(dir, block_size, sink).map(|_| None)
                }),
                RunMode::Verify => run_tasks(pool, &dirs, |dir| {
                    verify_directory(dir, block_size, sink).map(Some)
                }),
            };
            tally(&dirs, results, Tally::Directory, summary);
        }
        Ok(())
    }

    fn walk(&self, root: &Path) -> Result<WalkOutput, ApiError> {
        Walker::with_config(root.to_path_buf(), self.options.walker.clone())
            .walk()
            .map_err(ApiError::from)
    }

    fn thread_pool(&self) -> Result<Option<ThreadPool>, ApiError> {
        if self.options.jobs == 1 {
            return Ok(None);
        }
        ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .thread_name(|i| format!("md5tree-worker-{i}"))
            .build()
            .map(Some)
            .map_err(|e| ApiError::ConfigError(format!("Failed to start worker pool: {}", e)))
    }
}

/// Canonicalize `path`, requiring an existing directory.
pub fn require_directory(path: &Path) -> Result<PathBuf, ApiError> {
    if !path.is_dir() {
        return Err(ApiError::InvalidArgument(format!(
            "ERROR: {} is not a valid directory.",
            path.display()
        )));
    }
    canonicalize_root(path).map_err(|e| ApiError::InvalidArgument(e.to_string()))
}

/// Directories grouped by depth below the walk root, shallowest first.
fn directory_levels(walk: &WalkOutput) -> BTreeMap<usize, Vec<PathBuf>> {
    let mut levels: BTreeMap<usize, Vec<PathBuf>> = BTreeMap::new();
    for (path, depth) in walk.directories() {
        levels.entry(depth).or_default().push(path.to_path_buf());
    }
    levels
}

/// Run `task` over `items`, on `pool` when one is given, preserving item order.
fn run_tasks<T, R, F>(pool: Option<&ThreadPool>, items: &[T], task: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    match pool {
        Some(pool) => pool.install(|| items.par_iter().map(&task).collect()),
        None => items.iter().map(&task).collect(),
    }
}

fn tally(
    entities: &[PathBuf],
    results: Vec<Result<Option<VerifyStatus>, StorageError>>,
    kind: Tally,
    summary: &mut RunSummary,
) {
    for (entity, result) in entities.iter().zip(results) {
        match (result, kind) {
            (Ok(status), Tally::File) => {
                summary.files_digested += 1;
                if let Some(status) = status {
                    summary.record_verify(&status);
                }
            }
            (Ok(status), Tally::Directory) => {
                summary.directories_aggregated += 1;
                if let Some(status) = status {
                    summary.record_verify(&status);
                }
            }
            (Err(e), kind) => {
                debug!(path = %entity.display(), "{}", e);
                match kind {
                    Tally::File => summary.files_failed += 1,
                    Tally::Directory => summary.directories_failed += 1,
                }
                summary.failures.push(Failure::from_error(&e, entity));
            }
        }
    }
}

/// Walk failures count like any other per-entity failure and reach the sink as such.
fn record_walk_errors(
    walk: &WalkOutput,
    kind: Tally,
    sink: &dyn ProgressSink,
    summary: &mut RunSummary,
) {
    for err in &walk.errors {
        let entity = err.path().map(Path::to_path_buf).unwrap_or_default();
        let error = err.to_string();
        match kind {
            Tally::File => {
                summary.files_failed += 1;
                sink.emit(DigestEvent::FileFailed {
                    path: entity.clone(),
                    error,
                });
            }
            Tally::Directory => {
                summary.directories_failed += 1;
                sink.emit(DigestEvent::DirectoryFailed {
                    path: entity.clone(),
                    error,
                });
            }
        }
        summary.failures.push(Failure::from_error(err, &entity));
    }
}
