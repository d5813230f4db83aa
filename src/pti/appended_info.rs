//! Bit-packed appended-info trailer of a PTI frame.
//!
//! The trailer is self-describing from its last byte: `APPENDED_INFO_CFG`
//! carries the trailer length and the direction bit that decides whether an
//! RSSI byte is present at all, so everything here parses back-to-front.
//!
//! Trailer layout for Z-Wave, last byte first:
//!
//! ```text
//! [ RSSI? | RADIO_CONFIG | RADIO_INFO | STATUS_0 | APPENDED_INFO_CFG ]
//!   0/1 B       1 B           1 B         1 B           1 B
//! ```

use tracing::debug;

/// Protocol identifier carried in `STATUS_0`; anything else on the shared
/// trace transport is dropped.
pub const PROTOCOL_ID_ZWAVE: u8 = 6;

/// Raw RSSI compensation applied from appended-info version 1 onward.
pub const RSSI_OFFSET: u8 = 0x32;

/// `RADIO_CONFIG` byte. For Z-Wave this is a single byte holding the region
/// identifier; b7..b5 are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtiRadioConfig {
    /// 5-bit RAIL region identifier (b4..b0).
    pub region_id: u8,
}

impl PtiRadioConfig {
    pub fn from_byte(data: u8) -> Self {
        Self { region_id: data & 0b0001_1111 }
    }

    pub fn to_byte(self) -> u8 {
        self.region_id & 0b0001_1111
    }
}

/// `RADIO_INFO` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtiRadioInfo {
    /// b7
    pub antenna_selected: bool,
    /// b6
    pub syncword_selected: bool,
    /// 6-bit channel number (b5..b0).
    pub channel_number: u8,
}

impl PtiRadioInfo {
    pub fn from_byte(data: u8) -> Self {
        Self {
            antenna_selected: data & 0b1000_0000 != 0,
            syncword_selected: data & 0b0100_0000 != 0,
            channel_number: data & 0b0011_1111,
        }
    }

    pub fn to_byte(self) -> u8 {
        (u8::from(self.antenna_selected) << 7)
            | (u8::from(self.syncword_selected) << 6)
            | (self.channel_number & 0b0011_1111)
    }
}

/// `STATUS_0` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtiStatus0 {
    /// 4-bit error code (b7..b4).
    pub error_code: u8,
    /// 4-bit protocol identifier (b3..b0).
    pub protocol_id: u8,
}

impl PtiStatus0 {
    pub fn from_byte(data: u8) -> Self {
        Self { error_code: (data & 0b1111_0000) >> 4, protocol_id: data & 0b0000_1111 }
    }

    pub fn to_byte(self) -> u8 {
        ((self.error_code & 0b0000_1111) << 4) | (self.protocol_id & 0b0000_1111)
    }
}

/// `APPENDED_INFO_CFG` byte; b7 is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtiAppendedInfoCfg {
    /// b6 — direction: Rx = 1, Tx = 0. Decides whether the RSSI byte exists.
    pub is_rx: bool,
    /// 3-bit length (b5..b3): total appended-info length minus the 3
    /// mandatory bytes (CFG, STATUS_0, RADIO_INFO).
    pub length: u8,
    /// 3-bit version (b2..b0). Version 1 onward requires the RSSI offset
    /// compensation.
    pub version: u8,
}

impl PtiAppendedInfoCfg {
    pub fn from_byte(data: u8) -> Self {
        Self {
            is_rx: data & 0b0100_0000 != 0,
            length: (data & 0b0011_1000) >> 3,
            version: data & 0b0000_0111,
        }
    }

    pub fn to_byte(self) -> u8 {
        (u8::from(self.is_rx) << 6) | ((self.length & 0b0000_0111) << 3) | (self.version & 0b0000_0111)
    }
}

/// Decoded appended-info trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtiAppendedInfo {
    /// Raw RSSI byte; present only for receive frames.
    pub rssi: Option<u8>,
    pub radio_config: PtiRadioConfig,
    pub radio_info: PtiRadioInfo,
    pub status_0: PtiStatus0,
    pub cfg: PtiAppendedInfoCfg,
}

impl PtiAppendedInfo {
    /// Parse the trailer from the tail of `frame`, walking backward.
    ///
    /// Returns `None` when the buffer is too short or when `STATUS_0` names a
    /// protocol other than Z-Wave.
    pub fn decode(frame: &[u8]) -> Option<Self> {
        let n = frame.len();
        if n < 4 {
            return None;
        }

        let cfg = PtiAppendedInfoCfg::from_byte(frame[n - 1]);
        let status_0 = PtiStatus0::from_byte(frame[n - 2]);

        // feature-detection boundary: other protocols share this transport
        if status_0.protocol_id != PROTOCOL_ID_ZWAVE {
            debug!(protocol_id = status_0.protocol_id, "PTI frame is not Z-Wave");
            return None;
        }

        let radio_info = PtiRadioInfo::from_byte(frame[n - 3]);
        let radio_config = PtiRadioConfig::from_byte(frame[n - 4]);

        let rssi = if cfg.is_rx {
            if n < 5 {
                return None;
            }
            Some(frame[n - 5])
        } else {
            None
        };

        Some(Self { rssi, radio_config, radio_info, status_0, cfg })
    }

    /// Encode the trailer; the RSSI byte leads and is emitted only when
    /// present.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5);
        if let Some(rssi) = self.rssi {
            out.push(rssi);
        }
        out.push(self.radio_config.to_byte());
        out.push(self.radio_info.to_byte());
        out.push(self.status_0.to_byte());
        out.push(self.cfg.to_byte());
        out
    }

    /// On-wire trailer length as declared by the cfg byte.
    pub fn wire_len(&self) -> usize {
        self.cfg.length as usize + 3
    }

    /// Corrected RSSI in dBm: 0 for transmit frames; from cfg version 1
    /// onward the raw byte is offset by [`RSSI_OFFSET`].
    pub fn rssi_dbm(&self) -> i16 {
        match self.rssi {
            None => 0,
            Some(raw) if self.cfg.version >= 1 => i16::from(raw) - i16::from(RSSI_OFFSET),
            Some(raw) => i16::from(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cfg_byte_round_trip() {
        // 0x51 = rx, length 2, version 1 (taken from a live Rx capture)
        let cfg = PtiAppendedInfoCfg::from_byte(0x51);
        assert!(cfg.is_rx);
        assert_eq!(cfg.length, 2);
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.to_byte(), 0x51);

        // 0x09 = tx, length 1, version 1
        let cfg = PtiAppendedInfoCfg::from_byte(0x09);
        assert!(!cfg.is_rx);
        assert_eq!(cfg.length, 1);
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.to_byte(), 0x09);
    }

    #[test]
    fn status0_byte_round_trip() {
        let status = PtiStatus0::from_byte(0x26);
        assert_eq!(status.error_code, 2);
        assert_eq!(status.protocol_id, PROTOCOL_ID_ZWAVE);
        assert_eq!(status.to_byte(), 0x26);
    }

    #[test]
    fn radio_info_byte_round_trip() {
        let info = PtiRadioInfo::from_byte(0xC3);
        assert!(info.antenna_selected);
        assert!(info.syncword_selected);
        assert_eq!(info.channel_number, 3);
        assert_eq!(info.to_byte(), 0xC3);
    }

    #[test]
    fn decode_rx_trailer_with_rssi() {
        // rssi 0x1C | radio_config 0x01 | radio_info 0x01 | status_0 0x06 | cfg 0x51
        let bytes = [0x1C, 0x01, 0x01, 0x06, 0x51];
        let info = PtiAppendedInfo::decode(&bytes).expect("valid Rx trailer");
        assert_eq!(info.rssi, Some(0x1C));
        assert_eq!(info.radio_config.region_id, 1);
        assert_eq!(info.radio_info.channel_number, 1);
        assert_eq!(info.wire_len(), 5);
        assert_eq!(info.rssi_dbm(), 0x1C - 0x32);
        assert_eq!(info.encode(), bytes);
    }

    #[test]
    fn decode_tx_trailer_without_rssi() {
        let bytes = [0x02, 0x0B, 0x06, 0x09];
        let info = PtiAppendedInfo::decode(&bytes).expect("valid Tx trailer");
        assert_eq!(info.rssi, None);
        assert_eq!(info.wire_len(), 4);
        assert_eq!(info.rssi_dbm(), 0);
        assert_eq!(info.encode(), bytes);
    }

    #[test]
    fn decode_rejects_foreign_protocol() {
        // status_0 protocol nibble 0x0F is not Z-Wave
        let bytes = [0x1C, 0x01, 0x01, 0x0F, 0x51];
        assert!(PtiAppendedInfo::decode(&bytes).is_none());
    }

    #[test]
    fn rssi_offset_only_from_version_one() {
        let mut info = PtiAppendedInfo::decode(&[0x40, 0x01, 0x01, 0x06, 0x51]).unwrap();
        assert_eq!(info.rssi_dbm(), 0x40 - 0x32);
        info.cfg.version = 0;
        assert_eq!(info.rssi_dbm(), 0x40);
    }

    proptest! {
        #[test]
        fn trailer_bytes_round_trip(
            rssi in any::<u8>(),
            region_id in 0u8..32,
            radio_info in any::<u8>(),
            error_code in 0u8..16,
            version in 0u8..8,
            is_rx in any::<bool>(),
        ) {
            let info = PtiAppendedInfo {
                rssi: is_rx.then_some(rssi),
                radio_config: PtiRadioConfig { region_id },
                radio_info: PtiRadioInfo::from_byte(radio_info),
                status_0: PtiStatus0 { error_code, protocol_id: PROTOCOL_ID_ZWAVE },
                cfg: PtiAppendedInfoCfg { is_rx, length: 1 + u8::from(is_rx), version },
            };
            let decoded = PtiAppendedInfo::decode(&info.encode()).expect("round-trip");
            prop_assert_eq!(decoded, info);
        }
    }
}
