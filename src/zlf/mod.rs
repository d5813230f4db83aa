//! ZLF sniffer trace file reading and writing.
//!
//! ZLF is the trace container consumed by the desktop sniffer. The format is
//! a fixed 2048-byte file header followed by data chunks:
//!
//! ```text
//! timestamp:u64 LE | properties:u8 | length:u32 LE | payload | api_type:u8
//! ```
//!
//! Chunk timestamps use the sniffer's foreign epoch: 100 ns ticks counted
//! from year 1, with a 2-bit kind tag in the top bits (we always tag UTC).
//! Payloads are raw DCH packets, stored verbatim — the ZLF file is the
//! lossless record of everything the socket delivered.

mod reader;
mod writer;

pub use reader::{ZlfChunk, ZlfReader};
pub use writer::ZlfWriter;

/// Size of the constant file header.
pub const ZLF_HEADER_SIZE: usize = 2048;

/// The constant file header: version byte `0x68`, zero padding, trailer
/// `0x23 0x12`.
pub(crate) const ZLF_HEADER: [u8; ZLF_HEADER_SIZE] = {
    let mut header = [0u8; ZLF_HEADER_SIZE];
    header[0] = 0x68;
    header[ZLF_HEADER_SIZE - 2] = 0x23;
    header[ZLF_HEADER_SIZE - 1] = 0x12;
    header
};

/// Chunk envelope bytes around the payload: timestamp + properties + length
/// before, api_type after.
pub(crate) const CHUNK_ENVELOPE_SIZE: usize = 8 + 1 + 4 + 1;

/// `api_type` tag for sniffer (PTI) chunks.
pub const ZLF_API_TYPE_SNIFFER: u8 = 0xF5;

/// `properties` value for received chunks; everything we capture is a
/// reception from the board's point of view.
pub(crate) const ZLF_PROPERTY_RX: u8 = 0x00;

/// 100 ns ticks between the sniffer epoch's zero (0001-01-01) and the Unix
/// epoch.
pub(crate) const TICKS_TO_UNIX_EPOCH: u64 = 621_355_968_000_000_000;

/// Kind tag for UTC timestamps, stored in the top bit.
pub(crate) const TICK_KIND_UTC: u64 = 1 << 63;
