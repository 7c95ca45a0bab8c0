//! CLI route: run context. Resolves configuration, drives the pipeline and the
//! progress reporter, and hands the summary to presentation.

use crate::cli::parse::{Cli, SummaryFormat};
use crate::cli::presentation::format_summary;
use crate::config::{ConfigLoader, Md5TreeConfig};
use crate::error::ApiError;
use crate::pipeline::{Pipeline, RunMode, RunOptions, RunSummary};
use crate::progress::{ProgressBus, ReportStyle, Reporter};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Runtime context for one CLI invocation.
pub struct RunContext {
    config: Md5TreeConfig,
    source_dir: Option<PathBuf>,
    destination_dir: Option<PathBuf>,
    mode: RunMode,
    summary_format: SummaryFormat,
    quiet: bool,
    color: bool,
}

impl RunContext {
    /// Load layered configuration, apply command-line overrides and validate.
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = load_config(cli.config.as_deref())?;
        apply_overrides(&mut config, cli);
        let config = config.validated()?;
        debug!(?config, "Effective configuration");

        Ok(Self {
            config,
            source_dir: cli.source_dir.clone(),
            destination_dir: cli.destination_dir.clone(),
            mode: if cli.verify {
                RunMode::Verify
            } else {
                RunMode::Generate
            },
            summary_format: cli.summary,
            quiet: cli.quiet,
            color: io::stdout().is_terminal(),
        })
    }

    pub fn config(&self) -> &Md5TreeConfig {
        &self.config
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            mode: self.mode,
            digest: self.config.digest,
            jobs: self.config.run.jobs,
            walker: self.config.walk.clone(),
        }
    }

    fn progress_style(&self) -> ReportStyle {
        if self.quiet {
            ReportStyle::Off
        } else {
            self.config.run.progress
        }
    }

    /// Run the pipeline with a reporter thread rendering progress on stdout.
    pub fn execute(&self) -> Result<RunSummary, ApiError> {
        let (source, destination) = match (&self.source_dir, &self.destination_dir) {
            (Some(source), Some(destination)) => (source, destination),
            _ => {
                return Err(ApiError::InvalidArgument(
                    "ERROR: source and destination directories are required.".to_string(),
                ))
            }
        };
        let pipeline = Pipeline::new(source, destination, self.run_options())?;

        let (bus, receiver) = ProgressBus::new_pair();
        let reporter =
            Reporter::new(self.progress_style(), self.color, io::stdout()).spawn(receiver);

        let result = pipeline.run(&bus);
        // Closing the last sender ends the reporter loop
        drop(bus);

        match reporter.join() {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Progress output failed: {}", e),
            Err(_) => warn!("Progress reporter thread panicked"),
        }
        result
    }

    /// Render the summary as configured.
    pub fn render(&self, summary: &RunSummary) -> Result<Option<String>, ApiError> {
        format_summary(summary, self.summary_format, self.color)
    }
}

/// Explicit config file in place of the global one, otherwise the standard layers.
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<Md5TreeConfig, ApiError> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Command-line flags win over every configuration layer.
fn apply_overrides(config: &mut Md5TreeConfig, cli: &Cli) {
    if let Some(block_size) = cli.block_size {
        config.digest.block_size = block_size;
    }
    if let Some(interval) = cli.progress_interval {
        config.digest.progress_interval = interval;
    }
    if let Some(jobs) = cli.jobs {
        config.run.jobs = jobs;
    }
    if let Some(style) = cli.progress {
        config.run.progress = style;
    }
    config.walk.ignore_patterns.extend(cli.ignore.iter().cloned());
}
