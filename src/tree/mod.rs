//! Filesystem checksum tree
//!
//! Per-file digests mirrored from a source tree, and shallow per-directory
//! aggregates computed over the mirrored tree.

pub mod aggregate;
pub mod artifact;
pub mod hasher;
pub mod mirror;
pub mod path;
pub mod walker;
