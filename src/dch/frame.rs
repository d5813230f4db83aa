//! DCH frame codec.
//!
//! One DCH frame wraps one PTI frame between the `[` / `]` boundary markers.
//! Two wire versions are in circulation and differ only in the header that
//! follows the common start/length/version prefix:
//!
//! ```text
//!               DCHv2                            DCHv3
//!   start   u8   0x5B                start   u8   0x5B
//!   length  u16                      length  u16
//!   version u16  = 2                 version u16  = 3
//!   time    u48  microseconds        time    u64  nanoseconds
//!   type    u16                      type    u16
//!   seq     u8                       flags   u32
//!                                    seq     u16
//!   payload …                        payload …
//!   stop    u8   0x5D                stop    u8   0x5D
//! ```
//!
//! The declared length excludes the two boundary markers; DCH timestamps
//! count from the first boot of the adapter board, not from the Unix epoch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pti::PtiFrame;

/// DCH frame boundary markers, `[` and `]`.
pub const DCH_START: u8 = 0x5B;
pub const DCH_END: u8 = 0x5D;

/// DCHv2 header size in wire-length units (length and version fields
/// included, boundary markers and payload excluded).
const V2_HEADER_SIZE: usize = 13;
/// DCHv3 header size, same accounting.
const V3_HEADER_SIZE: usize = 20;

/// Radio-diagnostic DCH frame types; every other discriminator on the
/// transport is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum DchType {
    PtiTx = 0x29,
    PtiRx = 0x2A,
    PtiOther = 0x2B,
}

impl DchType {
    /// Map a wire discriminator to a radio-diagnostic type, if it is one.
    pub fn from_wire(value: u16) -> Option<Self> {
        match value {
            0x29 => Some(DchType::PtiTx),
            0x2A => Some(DchType::PtiRx),
            0x2B => Some(DchType::PtiOther),
            _ => None,
        }
    }
}

/// Version-dependent DCH frame header.
///
/// Modeled as an enum so that "flags present but version is 2" cannot be
/// expressed, and so the timestamp accessors are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DchHeader {
    V2 {
        /// Microseconds since board boot; 48 bits on the wire.
        timestamp_us: u64,
        dch_type: DchType,
        sequence_number: u8,
    },
    V3 {
        /// Nanoseconds since board boot.
        timestamp_ns: u64,
        dch_type: DchType,
        flags: u32,
        sequence_number: u16,
    },
}

impl DchHeader {
    /// Wire protocol version of this header.
    pub fn version(&self) -> u16 {
        match self {
            DchHeader::V2 { .. } => 2,
            DchHeader::V3 { .. } => 3,
        }
    }

    pub fn dch_type(&self) -> DchType {
        match self {
            DchHeader::V2 { dch_type, .. } | DchHeader::V3 { dch_type, .. } => *dch_type,
        }
    }

    pub fn sequence_number(&self) -> u16 {
        match self {
            DchHeader::V2 { sequence_number, .. } => u16::from(*sequence_number),
            DchHeader::V3 { sequence_number, .. } => *sequence_number,
        }
    }

    /// Timestamp normalized to microseconds.
    pub fn timestamp_us(&self) -> u64 {
        match self {
            DchHeader::V2 { timestamp_us, .. } => *timestamp_us,
            DchHeader::V3 { timestamp_ns, .. } => timestamp_ns / 1_000,
        }
    }

    /// Timestamp normalized to nanoseconds.
    pub fn timestamp_ns(&self) -> u64 {
        match self {
            DchHeader::V2 { timestamp_us, .. } => timestamp_us * 1_000,
            DchHeader::V3 { timestamp_ns, .. } => *timestamp_ns,
        }
    }

    /// Header size in wire-length units.
    fn size(&self) -> usize {
        match self {
            DchHeader::V2 { .. } => V2_HEADER_SIZE,
            DchHeader::V3 { .. } => V3_HEADER_SIZE,
        }
    }
}

/// One decoded DCH frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DchFrame {
    /// Declared wire length: everything between the boundary markers,
    /// markers excluded. The true byte span is [`DchFrame::wire_len`].
    pub length: u16,
    pub header: DchHeader,
    pub payload: PtiFrame,
}

impl DchFrame {
    /// Build a frame from parts, computing the declared length.
    pub fn new(header: DchHeader, payload: PtiFrame) -> Self {
        let length = (header.size() + payload.wire_len()) as u16;
        Self { length, header, payload }
    }

    /// Decode one DCH frame from the start of `frame`.
    ///
    /// Trailing bytes past the declared length are ignored so that callers
    /// can decode runs of concatenated frames. Fails closed (`None`, debug
    /// log) on every malformed layout.
    pub fn decode(frame: &[u8]) -> Option<Self> {
        if frame.len() < 5 {
            return None;
        }

        let length = u16::from_le_bytes([frame[1], frame[2]]);
        let version = u16::from_le_bytes([frame[3], frame[4]]);

        if frame[0] != DCH_START {
            return None;
        }

        // the length field does not count the start and stop markers
        let wire_len = length as usize + 2;
        if frame.len() < wire_len {
            debug!("DCH frame length mismatch");
            return None;
        }

        let stop_index = length as usize + 1;
        if frame[stop_index] != DCH_END {
            return None;
        }

        let header = match version {
            2 => {
                if length as usize <= V2_HEADER_SIZE {
                    // no payload to parse
                    return None;
                }
                let mut ts = [0u8; 8];
                ts[..6].copy_from_slice(&frame[5..11]);
                let dch_type = DchType::from_wire(u16::from_le_bytes([frame[11], frame[12]]))?;
                DchHeader::V2 {
                    timestamp_us: u64::from_le_bytes(ts),
                    dch_type,
                    sequence_number: frame[13],
                }
            }
            3 => {
                if length as usize <= V3_HEADER_SIZE {
                    return None;
                }
                let timestamp_ns = u64::from_le_bytes(frame[5..13].try_into().ok()?);
                let dch_type = DchType::from_wire(u16::from_le_bytes([frame[13], frame[14]]))?;
                DchHeader::V3 {
                    timestamp_ns,
                    dch_type,
                    flags: u32::from_le_bytes(frame[15..19].try_into().ok()?),
                    sequence_number: u16::from_le_bytes([frame[19], frame[20]]),
                }
            }
            _ => {
                debug!(version, "DCH frame version unsupported");
                return None;
            }
        };

        // the header size already counts the length/version prefix, so only
        // the start marker is added on top
        let payload_start = header.size() + 1;
        let payload = PtiFrame::decode(&frame[payload_start..stop_index])?;

        Some(Self { length, header, payload })
    }

    /// Encode the frame, version-dispatching on the stored header.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        out.push(DCH_START);
        out.extend_from_slice(&self.length.to_le_bytes());
        out.extend_from_slice(&self.header.version().to_le_bytes());
        match self.header {
            DchHeader::V2 { timestamp_us, dch_type, sequence_number } => {
                out.extend_from_slice(&timestamp_us.to_le_bytes()[..6]);
                out.extend_from_slice(&(dch_type as u16).to_le_bytes());
                out.push(sequence_number);
            }
            DchHeader::V3 { timestamp_ns, dch_type, flags, sequence_number } => {
                out.extend_from_slice(&timestamp_ns.to_le_bytes());
                out.extend_from_slice(&(dch_type as u16).to_le_bytes());
                out.extend_from_slice(&flags.to_le_bytes());
                out.extend_from_slice(&sequence_number.to_le_bytes());
            }
        }
        out.extend(self.payload.encode());
        out.push(DCH_END);
        out
    }

    /// True byte span of the frame: declared length plus both markers.
    pub fn wire_len(&self) -> usize {
        self.length as usize + 2
    }
}
