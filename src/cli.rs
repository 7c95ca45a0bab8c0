//! CLI domain: parse, route, output, and presentation only.
//! No checksum logic; the route hands a configured pipeline to the reporter.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, verification_outcome};
pub use parse::{Cli, SummaryFormat};
pub use presentation::{format_summary, format_summary_json, format_summary_text};
pub use route::RunContext;
