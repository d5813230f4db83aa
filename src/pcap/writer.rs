//! PCAP file writer.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::tap;
use super::{TAP_HEADER_AND_TLVS_SIZE, TAP_TLV_WORDS, TAP_VERSION, TLV_FCS, TLV_RF_INFO, TLV_RSS};
use crate::dch::{DchFrame, DchPacket};
use crate::rail::{self, RailRegionId};
use crate::{Result, TraceError};

/// Append-only pcap writer: the file header is written once at creation,
/// then every frame of each appended DCH packet becomes one packet record.
pub struct PcapWriter {
    file: File,
    path: PathBuf,
}

impl PcapWriter {
    /// Create a new pcap file, overwriting any existing file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file =
            File::create(&path).map_err(|e| TraceError::file_error(path.clone(), e))?;
        file.write_all(&super::file_header())
            .map_err(|e| TraceError::file_error(path.clone(), e))?;
        Ok(Self { file, path })
    }

    /// Append every frame of `packet` as a packet record.
    ///
    /// `reference_time_us` is the capture-start wall clock in microseconds;
    /// frame timestamps count from board boot and are added to it. All
    /// records are encoded before anything is written, so a frame with an
    /// unknown region/channel combination fails the call without leaving
    /// partial bytes in the file.
    pub fn append(&mut self, packet: &DchPacket, reference_time_us: u64) -> Result<()> {
        let mut records = Vec::new();
        for frame in &packet.frames {
            encode_record(&mut records, frame, reference_time_us)?;
        }
        self.file
            .write_all(&records)
            .map_err(|e| TraceError::file_error(self.path.clone(), e))?;
        trace!(frames = packet.frames.len(), "appended pcap records");
        Ok(())
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn encode_record(out: &mut Vec<u8>, frame: &DchFrame, reference_time_us: u64) -> Result<()> {
    let info = &frame.payload.appended_info;
    let region_id = info.radio_config.region_id;
    let channel_number = info.radio_info.channel_number;

    // an unused slot here means the frame is lying about its radio config;
    // fail loudly instead of writing wrong metadata
    let unknown = || TraceError::UnknownChannel { region: region_id, channel: channel_number };
    let region = RailRegionId::from_id(region_id).ok_or_else(unknown)?;
    let channel = rail::channel(region_id, channel_number).ok_or_else(unknown)?;

    let rate = tap::data_rate(channel.baud);
    let fcs = tap::fcs_type(rate);
    let rss = f32::from(info.rssi_dbm());

    let time_us = reference_time_us + frame.header.timestamp_us();
    let ts_sec = (time_us / 1_000_000) as u32;
    let ts_usec = (time_us % 1_000_000) as u32;
    let packet_length = (TAP_HEADER_AND_TLVS_SIZE + frame.payload.ota.len()) as u32;

    // packet record header; no truncation, so both lengths agree
    out.extend_from_slice(&ts_sec.to_le_bytes());
    out.extend_from_slice(&ts_usec.to_le_bytes());
    out.extend_from_slice(&packet_length.to_le_bytes());
    out.extend_from_slice(&packet_length.to_le_bytes());

    // TAP header
    out.push(TAP_VERSION);
    out.push(0); // reserved
    out.extend_from_slice(&TAP_TLV_WORDS.to_le_bytes());

    // frame check sequence TLV
    out.extend_from_slice(&TLV_FCS.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.push(fcs);
    out.extend_from_slice(&[0, 0, 0]); // padding

    // receive signal strength TLV
    out.extend_from_slice(&TLV_RSS.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&rss.to_le_bytes());

    // radio frequency information TLV
    out.extend_from_slice(&TLV_RF_INFO.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&tap::region_code(region).to_le_bytes());
    out.extend_from_slice(&(rate as u16).to_le_bytes());
    out.extend_from_slice(&channel.frequency_khz.to_le_bytes());

    // raw OTA payload
    out.extend_from_slice(&frame.payload.ota);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dch::{DchHeader, DchType};
    use crate::pti::{
        PROTOCOL_ID_ZWAVE, PtiAppendedInfo, PtiAppendedInfoCfg, PtiFrame, PtiRadioConfig,
        PtiRadioInfo, PtiStatus0,
    };

    fn rx_frame(region_id: u8, channel_number: u8) -> DchFrame {
        let payload = PtiFrame {
            hw_start: 0xF8,
            ota: vec![0xDF, 0xEE, 0xBB, 0x0C],
            hw_end: 0xF9,
            appended_info: PtiAppendedInfo {
                rssi: Some(0x1C),
                radio_config: PtiRadioConfig { region_id },
                radio_info: PtiRadioInfo {
                    antenna_selected: false,
                    syncword_selected: false,
                    channel_number,
                },
                status_0: PtiStatus0 { error_code: 0, protocol_id: PROTOCOL_ID_ZWAVE },
                cfg: PtiAppendedInfoCfg { is_rx: true, length: 2, version: 1 },
            },
        };
        DchFrame::new(
            DchHeader::V2 { timestamp_us: 1_500_000, dch_type: DchType::PtiRx, sequence_number: 1 },
            payload,
        )
    }

    #[test]
    fn record_layout_for_known_frame() {
        let mut out = Vec::new();
        encode_record(&mut out, &rx_frame(1, 0), 10_000_000).unwrap();

        // record header: 10.0 s reference + 1.5 s frame timestamp
        assert_eq!(u32::from_le_bytes(out[0..4].try_into().unwrap()), 11);
        assert_eq!(u32::from_le_bytes(out[4..8].try_into().unwrap()), 500_000);
        let caplen = u32::from_le_bytes(out[8..12].try_into().unwrap());
        let origlen = u32::from_le_bytes(out[12..16].try_into().unwrap());
        assert_eq!(caplen, 32 + 4);
        assert_eq!(caplen, origlen);

        // TAP header
        assert_eq!(out[16], 1);
        assert_eq!(out[17], 0);
        assert_eq!(u16::from_le_bytes([out[18], out[19]]), 7);

        // FCS TLV: EU channel 0 is 100 kbit/s, so a 2-byte CRC
        assert_eq!(u16::from_le_bytes([out[20], out[21]]), 0);
        assert_eq!(u16::from_le_bytes([out[22], out[23]]), 1);
        assert_eq!(out[24], 2);
        assert_eq!(&out[25..28], &[0, 0, 0]);

        // RSS TLV: raw 0x1C, version 1, so -22 dBm
        assert_eq!(u16::from_le_bytes([out[28], out[29]]), 1);
        assert_eq!(u16::from_le_bytes([out[30], out[31]]), 4);
        assert_eq!(f32::from_le_bytes(out[32..36].try_into().unwrap()), -22.0);

        // RF info TLV: EU region code 0, R3, 869850 kHz
        assert_eq!(u16::from_le_bytes([out[36], out[37]]), 2);
        assert_eq!(u16::from_le_bytes([out[38], out[39]]), 8);
        assert_eq!(u16::from_le_bytes([out[40], out[41]]), 0x00);
        assert_eq!(u16::from_le_bytes([out[42], out[43]]), 3);
        assert_eq!(u32::from_le_bytes(out[44..48].try_into().unwrap()), 869_850);

        // payload
        assert_eq!(&out[48..], &[0xDF, 0xEE, 0xBB, 0x0C]);
    }

    #[test]
    fn unknown_channel_fails_loudly_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.pcap");
        let mut writer = PcapWriter::create(&path).unwrap();

        // EU has no fourth channel slot
        let packet = DchPacket { frames: vec![rx_frame(1, 0), rx_frame(1, 3)] };
        match writer.append(&packet, 0) {
            Err(TraceError::UnknownChannel { region: 1, channel: 3 }) => {}
            other => panic!("expected UnknownChannel, got {other:?}"),
        }

        // only the file header may exist
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, super::super::PCAP_HEADER_SIZE as u64);
    }
}
