//! PTI radio-diagnostic frame codec.
//!
//! A PTI frame wraps one over-the-air radio payload between two hardware
//! markers and ends with the bit-packed appended-info trailer. The trailer's
//! own length lives in its final byte, so the frame is parsed from the back:
//! trailer first, then the end marker, then everything between index 0 and
//! the end marker is the opaque OTA payload.

use tracing::debug;

use super::appended_info::PtiAppendedInfo;

/// Hardware marker emitted when the radio starts receiving.
pub const HW_RX_START: u8 = 0xF8;
/// Hardware marker for a successfully received frame.
pub const HW_RX_SUCCESS: u8 = 0xF9;
/// Hardware marker for an aborted reception.
pub const HW_RX_ABORT: u8 = 0xFA;
/// Hardware marker emitted when the radio starts transmitting.
pub const HW_TX_START: u8 = 0xFC;
/// Hardware marker for a successfully transmitted frame.
pub const HW_TX_SUCCESS: u8 = 0xFD;
/// Hardware marker for an aborted transmission.
pub const HW_TX_ABORT: u8 = 0xFE;

/// Smallest viable Z-Wave PTI frame: start + empty payload + end + 4-byte
/// appended info.
const MIN_FRAME_LEN: usize = 6;

/// One decoded radio-diagnostic frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtiFrame {
    /// Hardware start marker (Rx-start or Tx-start).
    pub hw_start: u8,
    /// Raw over-the-air payload, opaque to this layer.
    pub ota: Vec<u8>,
    /// Hardware end marker (Rx/Tx success or abort).
    pub hw_end: u8,
    pub appended_info: PtiAppendedInfo,
}

impl PtiFrame {
    /// Decode a PTI frame from `frame`.
    ///
    /// Returns `None` for inputs shorter than the minimum viable frame, for
    /// trailers that name a foreign protocol, and for any layout where the
    /// trailer length would overlap the markers.
    pub fn decode(frame: &[u8]) -> Option<Self> {
        if frame.len() < MIN_FRAME_LEN {
            return None;
        }

        let appended_info = PtiAppendedInfo::decode(frame)?;

        // the end marker sits right before the trailer
        let hw_end_pos = frame.len().checked_sub(1 + appended_info.wire_len())?;
        if hw_end_pos < 1 {
            debug!("PTI appended-info length overlaps the start marker");
            return None;
        }
        let hw_end = frame[hw_end_pos];
        let ota = frame[1..hw_end_pos].to_vec();
        let hw_start = frame[0];

        Some(Self { hw_start, ota, hw_end, appended_info })
    }

    /// Encode the frame; exact inverse of [`PtiFrame::decode`], including the
    /// omission of the RSSI byte for transmit frames.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len());
        out.push(self.hw_start);
        out.extend_from_slice(&self.ota);
        out.push(self.hw_end);
        out.extend(self.appended_info.encode());
        out
    }

    /// Total on-wire length of the frame.
    pub fn wire_len(&self) -> usize {
        self.ota.len() + self.appended_info.wire_len() + 2
    }
}
