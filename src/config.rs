//! Configuration System
//!
//! Layered configuration for the checksum run. Sources, lowest priority first: built-in
//! defaults, the global config file (or an explicit `--config` file in its place),
//! `MD5TREE_*` environment variables. Command-line flags are applied on top by the CLI.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::progress::ReportStyle;
use crate::tree::hasher::DigestOptions;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod environment;
    pub mod global_file;
}

pub use sources::environment::ENV_PREFIX;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Md5TreeConfig {
    /// Streaming digest settings
    #[serde(default)]
    pub digest: DigestOptions,

    /// Run-level settings
    #[serde(default)]
    pub run: RunConfig,

    /// Tree walk settings (applied to both walks)
    #[serde(default)]
    pub walk: WalkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Run-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Worker threads: 1 = sequential, 0 = one per CPU
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Progress rendering on stdout
    #[serde(default)]
    pub progress: ReportStyle,
}

fn default_jobs() -> usize {
    1
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            progress: ReportStyle::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Digest(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Digest(msg) => write!(f, "Digest: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl Md5TreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.digest.validate() {
            errors.push(ValidationError::Digest(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into one `ConfigError`.
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

/// Loads [`Md5TreeConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file if present, then the environment.
    pub fn load() -> Result<Md5TreeConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::environment::add_to_builder(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Defaults, then `path` (which must exist) in place of the global file, then the
    /// environment.
    pub fn load_from_file(path: &Path) -> Result<Md5TreeConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_file(builder, path, true);
        let builder = sources::environment::add_to_builder(builder);
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Where the global config file is looked up.
    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }
}
