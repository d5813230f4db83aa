//! ZLF file reader.

use std::fs;
use std::path::Path;

use tracing::warn;

use super::{ZLF_API_TYPE_SNIFFER, ZLF_HEADER, ZLF_HEADER_SIZE};
use crate::dch::DchPacket;
use crate::{Result, TraceError};

/// One data chunk read back from a ZLF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZlfChunk {
    /// Foreign-epoch timestamp (100 ns ticks, kind tag in the top bits).
    pub timestamp: u64,
    /// Direction/property byte (`0x00` = Rx).
    pub properties: u8,
    /// Raw chunk payload, exactly as captured from the socket.
    pub payload: Vec<u8>,
    /// Chunk type tag; sniffer chunks carry [`ZLF_API_TYPE_SNIFFER`].
    pub api_type: u8,
}

impl ZlfChunk {
    /// Decode the payload as a DCH packet; only sniffer-tagged chunks are
    /// attempted.
    pub fn packet(&self) -> Option<DchPacket> {
        if self.api_type != ZLF_API_TYPE_SNIFFER {
            return None;
        }
        DchPacket::decode(&self.payload)
    }
}

/// Sequential ZLF reader: forward-only cursor over the chunk area, ending at
/// end of file.
#[derive(Debug)]
pub struct ZlfReader {
    data: Vec<u8>,
    cursor: usize,
}

impl ZlfReader {
    /// Open a ZLF file; fails unless the leading 2048 bytes equal the
    /// expected constant header exactly.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| TraceError::file_error(path, e))?;
        if data.len() < ZLF_HEADER_SIZE || data[..ZLF_HEADER_SIZE] != ZLF_HEADER {
            return Err(TraceError::header_error(
                "ZLF",
                path,
                "leading bytes do not match the ZLF file header",
            ));
        }
        Ok(Self { data, cursor: ZLF_HEADER_SIZE })
    }

    /// Read the next chunk, advancing the cursor past its envelope and
    /// payload. Returns `None` at end of file or on a truncated trailing
    /// chunk.
    pub fn next_chunk(&mut self) -> Option<ZlfChunk> {
        if self.cursor >= self.data.len() {
            return None;
        }

        let remaining = &self.data[self.cursor..];
        if remaining.len() < 13 {
            warn!("truncated ZLF chunk envelope at end of file");
            self.cursor = self.data.len();
            return None;
        }

        let timestamp = u64::from_le_bytes(remaining[0..8].try_into().ok()?);
        let properties = remaining[8];
        let length = u32::from_le_bytes(remaining[9..13].try_into().ok()?) as usize;

        if remaining.len() < 13 + length + 1 {
            warn!(length, "truncated ZLF chunk payload at end of file");
            self.cursor = self.data.len();
            return None;
        }

        let payload = remaining[13..13 + length].to_vec();
        let api_type = remaining[13 + length];
        self.cursor += 13 + length + 1;

        Some(ZlfChunk { timestamp, properties, payload, api_type })
    }

    /// Read the next sniffer-tagged chunk that decodes as a DCH packet,
    /// skipping chunks of other types.
    pub fn next_packet(&mut self) -> Option<DchPacket> {
        while let Some(chunk) = self.next_chunk() {
            if let Some(packet) = chunk.packet() {
                return Some(packet);
            }
        }
        None
    }
}
