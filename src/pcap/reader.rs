//! PCAP file reader.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{TAP_HEADER_AND_TLVS_SIZE, TLV_FCS, TLV_RF_INFO, TLV_RSS};
use crate::{Result, TraceError};

/// One packet record read back from a Z-Wave TAP pcap file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapRecord {
    pub ts_sec: u32,
    pub ts_usec: u32,
    /// FCS width class from the checksum TLV.
    pub fcs_type: u8,
    /// Receive signal strength in dBm.
    pub rss: f32,
    /// TAP region code.
    pub region: u16,
    /// TAP data-rate code.
    pub data_rate: u16,
    /// Channel center frequency in kHz.
    pub frequency_khz: u32,
    /// Raw OTA payload.
    pub payload: Vec<u8>,
}

/// Sequential pcap reader: forward-only cursor over the packet records,
/// ending at end of file. Unknown TLV tags and truncated records are hard
/// decode errors.
#[derive(Debug)]
pub struct PcapReader {
    data: Vec<u8>,
    cursor: usize,
}

impl PcapReader {
    /// Open a pcap file; fails unless the 24-byte header matches the
    /// Z-Wave TAP capture header exactly.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| TraceError::file_error(path, e))?;
        if data.len() < super::PCAP_HEADER_SIZE
            || data[..super::PCAP_HEADER_SIZE] != super::file_header()
        {
            return Err(TraceError::header_error(
                "pcap",
                path,
                "leading bytes do not match the Z-Wave TAP capture header",
            ));
        }
        Ok(Self { data, cursor: super::PCAP_HEADER_SIZE })
    }

    /// Read the next packet record. `Ok(None)` at a clean end of file.
    pub fn next_packet(&mut self) -> Result<Option<TapRecord>> {
        if self.cursor >= self.data.len() {
            return Ok(None);
        }

        let remaining = &self.data[self.cursor..];
        if remaining.len() < 16 {
            return Err(TraceError::parse_error("pcap record", "truncated record header"));
        }

        let ts_sec = u32::from_le_bytes(remaining[0..4].try_into().unwrap_or_default());
        let ts_usec = u32::from_le_bytes(remaining[4..8].try_into().unwrap_or_default());
        let caplen = u32::from_le_bytes(remaining[8..12].try_into().unwrap_or_default()) as usize;
        let origlen = u32::from_le_bytes(remaining[12..16].try_into().unwrap_or_default()) as usize;

        if caplen != origlen {
            return Err(TraceError::parse_error(
                "pcap record",
                format!("captured length {caplen} differs from original length {origlen}"),
            ));
        }
        if caplen < TAP_HEADER_AND_TLVS_SIZE {
            return Err(TraceError::parse_error(
                "pcap record",
                format!("captured length {caplen} is shorter than the TAP encapsulation"),
            ));
        }
        if remaining.len() < 16 + caplen {
            return Err(TraceError::parse_error("pcap record", "truncated packet data"));
        }

        let tap = &remaining[16..16 + caplen];
        let tlv_word_count = u16::from_le_bytes([tap[2], tap[3]]) as usize;
        let tlv_section_len = tlv_word_count * 4;
        if 4 + tlv_section_len > tap.len() {
            return Err(TraceError::parse_error(
                "TAP header",
                format!("TLV section of {tlv_word_count} words exceeds the record"),
            ));
        }

        let (fcs_type, rss, rf) = parse_tlvs(&tap[4..4 + tlv_section_len])?;
        let (region, data_rate, frequency_khz) = rf;
        let payload = tap[4 + tlv_section_len..].to_vec();

        self.cursor += 16 + caplen;
        Ok(Some(TapRecord {
            ts_sec,
            ts_usec,
            fcs_type,
            rss,
            region,
            data_rate,
            frequency_khz,
            payload,
        }))
    }
}

/// Walk the TLV section, dispatching on each type tag. All three TLVs must
/// be present; an unknown tag is a hard decode error.
fn parse_tlvs(mut section: &[u8]) -> Result<(u8, f32, (u16, u16, u32))> {
    let mut fcs_type = None;
    let mut rss = None;
    let mut rf = None;

    while !section.is_empty() {
        if section.len() < 4 {
            return Err(TraceError::parse_error("TAP TLV", "truncated TLV header"));
        }
        let tlv_type = u16::from_le_bytes([section[0], section[1]]);
        let tlv_len = u16::from_le_bytes([section[2], section[3]]) as usize;
        // values are padded to a 32-bit word boundary
        let padded_len = tlv_len.div_ceil(4) * 4;
        if section.len() < 4 + padded_len {
            return Err(TraceError::parse_error("TAP TLV", "truncated TLV value"));
        }
        let value = &section[4..4 + tlv_len];

        match tlv_type {
            TLV_FCS => {
                if tlv_len != 1 {
                    return Err(TraceError::parse_error(
                        "TAP TLV",
                        format!("FCS TLV length {tlv_len}, expected 1"),
                    ));
                }
                fcs_type = Some(value[0]);
            }
            TLV_RSS => {
                if tlv_len != 4 {
                    return Err(TraceError::parse_error(
                        "TAP TLV",
                        format!("RSS TLV length {tlv_len}, expected 4"),
                    ));
                }
                rss = Some(f32::from_le_bytes(value.try_into().unwrap_or_default()));
            }
            TLV_RF_INFO => {
                if tlv_len != 8 {
                    return Err(TraceError::parse_error(
                        "TAP TLV",
                        format!("RF-info TLV length {tlv_len}, expected 8"),
                    ));
                }
                rf = Some((
                    u16::from_le_bytes([value[0], value[1]]),
                    u16::from_le_bytes([value[2], value[3]]),
                    u32::from_le_bytes(value[4..8].try_into().unwrap_or_default()),
                ));
            }
            unknown => {
                return Err(TraceError::parse_error(
                    "TAP TLV",
                    format!("unknown TLV type {unknown}"),
                ));
            }
        }

        section = &section[4 + padded_len..];
    }

    match (fcs_type, rss, rf) {
        (Some(fcs_type), Some(rss), Some(rf)) => Ok((fcs_type, rss, rf)),
        _ => Err(TraceError::parse_error("TAP TLV", "missing mandatory TLV")),
    }
}
