//! ZLF file writer.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::trace;

use super::{
    TICK_KIND_UTC, TICKS_TO_UNIX_EPOCH, ZLF_API_TYPE_SNIFFER, ZLF_HEADER, ZLF_PROPERTY_RX,
};
use crate::{Result, TraceError};

/// Append-only ZLF writer: the header is written once at creation, then each
/// received raw DCH chunk is appended with its timestamp envelope.
pub struct ZlfWriter {
    file: File,
    path: PathBuf,
}

impl ZlfWriter {
    /// Create a new ZLF file, overwriting any existing file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file =
            File::create(&path).map_err(|e| TraceError::file_error(path.clone(), e))?;
        file.write_all(&ZLF_HEADER).map_err(|e| TraceError::file_error(path.clone(), e))?;
        Ok(Self { file, path })
    }

    /// Append one raw DCH chunk, stamped with the current host time.
    pub fn append_chunk(&mut self, payload: &[u8]) -> Result<()> {
        self.append_chunk_at(sniffer_timestamp(SystemTime::now()), payload)
    }

    /// Append one raw DCH chunk with an explicit foreign-epoch timestamp.
    pub fn append_chunk_at(&mut self, timestamp: u64, payload: &[u8]) -> Result<()> {
        let mut chunk = Vec::with_capacity(super::CHUNK_ENVELOPE_SIZE + payload.len());
        chunk.extend_from_slice(&timestamp.to_le_bytes());
        chunk.push(ZLF_PROPERTY_RX);
        chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        chunk.extend_from_slice(payload);
        chunk.push(ZLF_API_TYPE_SNIFFER);

        self.file
            .write_all(&chunk)
            .map_err(|e| TraceError::file_error(self.path.clone(), e))?;
        trace!(len = payload.len(), "appended ZLF chunk");
        Ok(())
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Convert a host clock reading to the sniffer's timestamp format: 100 ns
/// ticks since year 1, UTC kind tag in the top bit.
pub fn sniffer_timestamp(now: SystemTime) -> u64 {
    let ticks_since_unix_epoch = now
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_nanos() / 100) as u64)
        .unwrap_or(0);
    (ticks_since_unix_epoch | TICK_KIND_UTC) + TICKS_TO_UNIX_EPOCH
}
