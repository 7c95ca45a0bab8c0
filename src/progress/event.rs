//! Event schema for digest progress.

use crate::types::DigestArtifact;
use crate::verify::VerifyStatus;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pipeline phase announced at the start of each walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Per-file digests mirrored into the destination tree
    Mirror,
    /// Per-directory aggregates over the destination tree
    Aggregate,
}

/// A single observation emitted while digesting or aggregating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DigestEvent {
    PhaseStarted {
        phase: Phase,
    },
    FileStarted {
        path: PathBuf,
        size: u64,
    },
    /// `percent` is relative to the size sampled before reading and may exceed 100.
    FileProgress {
        path: PathBuf,
        percent: f64,
    },
    FileDone {
        path: PathBuf,
        digest: DigestArtifact,
    },
    FileFailed {
        path: PathBuf,
        error: String,
    },
    DirectoryDone {
        path: PathBuf,
        digest: DigestArtifact,
    },
    DirectoryFailed {
        path: PathBuf,
        error: String,
    },
    Verified {
        path: PathBuf,
        #[serde(flatten)]
        status: VerifyStatus,
    },
}

/// Timestamped event as carried over the progress bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEnvelope {
    pub ts: String,
    #[serde(flatten)]
    pub event: DigestEvent,
}

impl ProgressEnvelope {
    pub fn new(ts: String, event: DigestEvent) -> Self {
        Self { ts, event }
    }

    pub fn with_now(event: DigestEvent) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
        }
    }
}
