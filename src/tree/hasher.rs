//! Streaming MD5 digests for files and byte streams

use crate::error::StorageError;
use crate::progress::{DigestEvent, ProgressSink};
use crate::types::{DigestArtifact, Hash};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{instrument, trace};

/// Default read block: 1 MiB
pub const DEFAULT_BLOCK_SIZE: usize = 1 << 20;

/// Default number of blocks between progress events
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 128;

/// Tuning knobs for streaming digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestOptions {
    /// Bytes per read. Governs memory use only, never the result.
    pub block_size: usize,
    /// Emit a progress event after every `progress_interval` blocks.
    pub progress_interval: u64,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl DigestOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.block_size == 0 {
            return Err("block_size must be greater than zero".to_string());
        }
        if self.progress_interval == 0 {
            return Err("progress_interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Compute the digest of an in-memory buffer.
pub fn compute_content_hash(content: &[u8]) -> DigestArtifact {
    let mut hasher = Md5::new();
    hasher.update(content);
    finalize(hasher)
}

pub(crate) fn finalize(hasher: Md5) -> DigestArtifact {
    let hash: Hash = hasher.finalize().into();
    DigestArtifact::from_hash(&hash)
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Feed `reader` into `hasher` block by block, in read order.
///
/// `on_block` is called after each block with the running block count and byte
/// count. Returns the total number of bytes consumed.
pub(crate) fn update_from_reader<R, F>(
    hasher: &mut Md5,
    reader: &mut R,
    buf: &mut [u8],
    mut on_block: F,
) -> io::Result<u64>
where
    R: Read,
    F: FnMut(u64, u64),
{
    let mut blocks = 0u64;
    let mut bytes = 0u64;
    loop {
        let n = read_block(reader, buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        blocks += 1;
        bytes += n as u64;
        on_block(blocks, bytes);
    }
    Ok(bytes)
}

/// Digest an arbitrary reader with the given block size.
pub fn digest_reader<R: Read>(reader: &mut R, block_size: usize) -> io::Result<DigestArtifact> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; block_size.max(1)];
    update_from_reader(&mut hasher, reader, &mut buf, |_, _| {})?;
    Ok(finalize(hasher))
}

/// Percentage of `bytes_read` over the size sampled before reading.
fn percent_complete(bytes_read: u64, size_at_start: u64) -> f64 {
    if size_at_start == 0 {
        100.0
    } else {
        bytes_read as f64 * 100.0 / size_at_start as f64
    }
}

/// Stream a file through MD5 and return its hex digest.
///
/// The file size is sampled once before reading. A `FileProgress` event is sent
/// after every `progress_interval`-th block. Nothing is written to disk.
#[instrument(skip(options, sink), fields(path = %path.display()))]
pub fn digest_file(
    path: &Path,
    options: &DigestOptions,
    sink: &dyn ProgressSink,
) -> Result<DigestArtifact, StorageError> {
    let read_failure = |source: io::Error| StorageError::ReadFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_failure)?;
    let size = file.metadata().map_err(read_failure)?.len();
    sink.emit(DigestEvent::FileStarted {
        path: path.to_path_buf(),
        size,
    });

    let interval = options.progress_interval.max(1);
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; options.block_size.max(1)];
    let total = update_from_reader(&mut hasher, &mut file, &mut buf, |blocks, bytes| {
        if blocks % interval == 0 {
            sink.emit(DigestEvent::FileProgress {
                path: path.to_path_buf(),
                percent: percent_complete(bytes, size),
            });
        }
    })
    .map_err(read_failure)?;

    let digest = finalize(hasher);
    trace!(bytes = total, digest = %digest, "Computed file digest");
    Ok(digest)
}
