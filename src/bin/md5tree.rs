//! md5tree CLI Binary
//!
//! Mirrors a source tree as `.md5` files and writes a `.dir.md5` aggregate for every
//! mirrored directory.

use clap::error::ErrorKind;
use clap::Parser;
use md5tree::cli::{map_error, verification_outcome, Cli, RunContext};
use md5tree::config::ConfigLoader;
use md5tree::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            // Printing can only fail if the terminal is gone
            let _ = e.print();
            process::exit(code);
        }
    };

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("md5tree starting");

    let context = match RunContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    if cli.print_config {
        match context.config().to_toml_string() {
            Ok(rendered) => print!("{}", rendered),
            Err(e) => {
                eprintln!("{}", map_error(&e));
                process::exit(1);
            }
        }
        return;
    }

    let summary = match context.execute() {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.render(&summary) {
        Ok(Some(rendered)) => println!("{}", rendered),
        Ok(None) => {}
        Err(e) => eprintln!("{}", map_error(&e)),
    }

    if let Err(e) = verification_outcome(&summary) {
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
