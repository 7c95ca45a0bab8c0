//! CLI presentation: text and json formatters for the run summary.

use crate::cli::parse::SummaryFormat;
use crate::error::ApiError;
use crate::pipeline::{RunMode, RunSummary};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

/// Render the summary in the requested format; `None` when the summary is switched off.
pub fn format_summary(
    summary: &RunSummary,
    format: SummaryFormat,
    color: bool,
) -> Result<Option<String>, ApiError> {
    match format {
        SummaryFormat::Off => Ok(None),
        SummaryFormat::Json => format_summary_json(summary).map(Some),
        SummaryFormat::Text => Ok(Some(format_summary_text(summary, color))),
    }
}

pub fn format_summary_json(summary: &RunSummary) -> Result<String, ApiError> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render summary: {}", e)))
}

/// Human-readable summary: a counts table followed by one line per failure.
pub fn format_summary_text(summary: &RunSummary, color: bool) -> String {
    let mut out = String::new();
    let title = match summary.mode {
        RunMode::Generate => "Checksum run",
        RunMode::Verify => "Verification run",
    };
    out.push_str(&format!("{}\n", format_section_heading(title, color)));
    out.push_str(&format!("  Source: {}\n", summary.source_root.display()));
    out.push_str(&format!(
        "  Destination: {}\n\n",
        summary.destination_root.display()
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Processed", "Failed"]);
    table.add_row(vec![
        "Files".to_string(),
        summary.files_digested.to_string(),
        summary.files_failed.to_string(),
    ]);
    table.add_row(vec![
        "Directories".to_string(),
        summary.directories_aggregated.to_string(),
        summary.directories_failed.to_string(),
    ]);
    out.push_str(&format!("{}\n", table));

    if summary.mode == RunMode::Verify {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["OK", "MISMATCH", "MISSING"]);
        table.add_row(vec![
            summary.matched.to_string(),
            summary.mismatched.to_string(),
            summary.missing.to_string(),
        ]);
        out.push_str(&format!("{}\n", table));
    }

    if !summary.failures.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            format_section_heading(&format!("Failures ({})", summary.failures.len()), color)
        ));
        for failure in &summary.failures {
            out.push_str(&format!("  - [{}] {}\n", failure.kind, failure.message));
        }
    }

    out.push_str(&format!("\nCompleted in {} ms", summary.duration_ms));
    out
}
