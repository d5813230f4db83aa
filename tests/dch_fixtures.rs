//! Fixture-driven tests of the DCH/PTI wire codecs through the public API.
//!
//! The two fixtures are real frames captured on a WPK adapter board: an ACK
//! received from an end device (DCHv2) and a NOP transmitted by a controller
//! (DCHv3).

use zwtrace::{DchFrame, DchPacket, DchType};

const DCH_V2_RX_ACK: [u8; 32] = [
    0x5B, // start symbol
    0x1E, 0x00, // length
    0x02, 0x00, // version
    0xCC, 0x9D, 0x29, 0xC5, 0x01, 0x05, // timestamp (us)
    0x2A, 0x00, // type
    0x6C, // sequence number
    0xF8, // PTI start, Rx start
    0xDF, 0xEE, 0xBB, 0x0C, 0x02, 0x03, 0x82, 0x0A, 0x01, 0xF1, // Z-Wave payload
    0xF9, // PTI stop, Rx success
    0x1C, 0x01, 0x01, 0x06, 0x51, // appended info
    0x5D, // stop symbol
];

const DCH_V3_TX_NOP: [u8; 39] = [
    0x5B, // start symbol
    0x25, 0x00, // length
    0x03, 0x00, // version
    0xCC, 0x9D, 0x29, 0xC5, 0x01, 0x05, 0x00, 0x00, // timestamp (ns)
    0x29, 0x00, // type
    0x00, 0x00, 0x00, 0x00, // flags
    0xB9, 0x6C, // sequence number
    0xFC, // PTI start, Tx start
    0xDF, 0xEE, 0xBB, 0x0C, 0x01, 0x41, 0x02, 0x0B, 0x02, 0x00, 0x32, // Z-Wave payload
    0xFD, // PTI stop, Tx success
    0x01, 0x01, 0x06, 0x09, // appended info (no RSSI)
    0x5D, // stop symbol
];

#[test]
fn dchv2_rx_fixture_decodes_and_reencodes_exactly() {
    let frame = DchFrame::decode(&DCH_V2_RX_ACK).expect("valid DCHv2 frame");
    assert_eq!(frame.header.dch_type(), DchType::PtiRx);
    assert_eq!(frame.header.version(), 2);
    assert_eq!(frame.payload.ota, &DCH_V2_RX_ACK[15..25]);
    assert_eq!(frame.payload.appended_info.rssi_dbm(), -22);
    assert_eq!(frame.encode(), DCH_V2_RX_ACK);
}

#[test]
fn dchv3_tx_fixture_decodes_and_reencodes_exactly() {
    let frame = DchFrame::decode(&DCH_V3_TX_NOP).expect("valid DCHv3 frame");
    assert_eq!(frame.header.dch_type(), DchType::PtiTx);
    assert_eq!(frame.header.version(), 3);
    assert_eq!(frame.header.sequence_number(), 0x6CB9);
    assert_eq!(frame.payload.appended_info.rssi, None);
    assert_eq!(frame.encode(), DCH_V3_TX_NOP);
}

#[test]
fn timestamp_accessors_normalize_per_version() {
    let v2 = DchFrame::decode(&DCH_V2_RX_ACK).unwrap();
    assert_eq!(v2.header.timestamp_ns(), v2.header.timestamp_us() * 1_000);

    let v3 = DchFrame::decode(&DCH_V3_TX_NOP).unwrap();
    assert_eq!(v3.header.timestamp_us(), v3.header.timestamp_ns() / 1_000);
}

#[test]
fn garbage_buffers_are_rejected_without_panicking() {
    assert!(DchFrame::decode(&[0u8; 3]).is_none());
    assert!(DchFrame::decode(&[0u8; 5000]).is_none());
    assert!(DchPacket::decode(&[]).is_none());
}

#[test]
fn packet_markers_are_checked_before_any_frame_parse() {
    let mut bytes = DCH_V2_RX_ACK.to_vec();
    bytes[0] = 0xFF;
    assert!(DchPacket::decode(&bytes).is_none());

    let mut bytes = DCH_V2_RX_ACK.to_vec();
    *bytes.last_mut().unwrap() = 0xFF;
    assert!(DchPacket::decode(&bytes).is_none());
}

#[test]
fn socket_read_with_two_frames_decodes_both() {
    let mut bytes = DCH_V2_RX_ACK.to_vec();
    bytes.extend_from_slice(&DCH_V3_TX_NOP);
    let packet = DchPacket::decode(&bytes).expect("two-frame packet");
    assert_eq!(packet.frames.len(), 2);
    assert_eq!(packet.frames[0].header.dch_type(), DchType::PtiRx);
    assert_eq!(packet.frames[1].header.dch_type(), DchType::PtiTx);
    assert_eq!(packet.encode(), bytes);
}

#[test]
fn foreign_protocol_id_fails_the_enclosing_frame() {
    // markers, lengths and version stay valid; only the status-0 protocol
    // nibble changes
    let mut bytes = DCH_V2_RX_ACK;
    bytes[29] = 0x04;
    assert!(DchFrame::decode(&bytes).is_none());
    assert!(DchPacket::decode(&bytes).is_none());
}
