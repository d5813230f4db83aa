//! DCH packet codec.
//!
//! One read from the trace socket can carry several concatenated DCH frames;
//! a packet is that read, bounded by the outer start/stop markers.

use tracing::debug;

use super::frame::{DCH_END, DCH_START, DchFrame};

/// Ordered run of DCH frames from a single transport read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DchPacket {
    pub frames: Vec<DchFrame>,
}

impl DchPacket {
    /// Decode a full transport read into its frames.
    ///
    /// All-or-nothing: if any inner frame fails to decode the whole packet is
    /// dropped, so a partially-garbled read never produces output.
    pub fn decode(packet: &[u8]) -> Option<Self> {
        if packet.is_empty() {
            return None;
        }

        if packet[0] != DCH_START || packet[packet.len() - 1] != DCH_END {
            // this buffer is not DCH
            return None;
        }

        let mut frames = Vec::new();
        let mut offset = 0;
        while packet.len() > offset {
            let Some(frame) = DchFrame::decode(&packet[offset..]) else {
                debug!(offset, "DCH frame parse failed, dropping whole packet");
                return None;
            };
            offset += frame.wire_len();
            frames.push(frame);
        }

        Some(Self { frames })
    }

    /// Concatenation of each frame's encoding, in order.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.frames.iter().map(DchFrame::wire_len).sum());
        for frame in &self.frames {
            out.extend(frame.encode());
        }
        out
    }
}
