//! CLI parse: clap types for md5tree. No behavior; definitions only.

use crate::progress::ReportStyle;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Mirror a directory tree as MD5 checksum files
#[derive(Parser, Debug)]
#[command(name = "md5tree", version)]
#[command(about = "Write an .md5 file per source file and a .dir.md5 aggregate per directory")]
pub struct Cli {
    /// Directory to checksum
    #[arg(required_unless_present = "print_config")]
    pub source_dir: Option<PathBuf>,

    /// Directory receiving the mirrored checksum files
    #[arg(required_unless_present = "print_config")]
    pub destination_dir: Option<PathBuf>,

    /// Compare against existing checksum files instead of writing them
    #[arg(long)]
    pub verify: bool,

    /// Configuration file path (replaces the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Bytes read per block
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Blocks between progress updates
    #[arg(long)]
    pub progress_interval: Option<u64>,

    /// Worker threads (1 = sequential, 0 = one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Entry names to skip in both trees (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Progress rendering on stdout
    #[arg(long, value_enum)]
    pub progress: Option<ReportStyle>,

    /// Run summary format
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Silence logging and progress lines
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes a file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Run summary rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
    Off,
}
