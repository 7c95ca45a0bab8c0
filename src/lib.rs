//! md5tree: mirrored MD5 checksum trees
//!
//! Walks a source directory, writes one `.md5` file per source file into a mirrored
//! destination tree, then writes a `.dir.md5` aggregate digest for every destination
//! subdirectory. A verify mode recomputes everything and compares with the artifacts
//! already on disk.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod tree;
pub mod types;
pub mod verify;
