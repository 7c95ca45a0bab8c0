//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;
use crate::pipeline::{RunMode, RunSummary};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::InvalidArgument(msg) => msg.clone(),
        other => format!("ERROR: {}", other),
    }
}

/// A verify run with any difference is a failed run; generate runs never are.
pub fn verification_outcome(summary: &RunSummary) -> Result<(), ApiError> {
    if summary.mode == RunMode::Verify && summary.has_differences() {
        return Err(ApiError::VerificationFailed {
            mismatched: summary.mismatched,
            missing: summary.missing,
        });
    }
    Ok(())
}
