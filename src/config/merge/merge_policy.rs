//! Merge rules: defaults, override order, conflict handling.

use crate::tree::hasher::{DEFAULT_BLOCK_SIZE, DEFAULT_PROGRESS_INTERVAL};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources (global or explicit file, then environment) override these keys.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("digest.block_size", DEFAULT_BLOCK_SIZE as i64)?
        .set_default("digest.progress_interval", DEFAULT_PROGRESS_INTERVAL as i64)?
        .set_default("run.jobs", 1_i64)?
        .set_default("run.progress", "line")
}
