//! PTI (packet trace interface) frame parsing and encoding.
//!
//! PTI frames are the radio-diagnostic payload carried inside DCH frames:
//! hardware start/end markers around the raw over-the-air bytes, followed by
//! a self-describing appended-info trailer with the radio metadata (RSSI,
//! region, channel, protocol).

mod appended_info;
mod frame;

pub use appended_info::{
    PROTOCOL_ID_ZWAVE, PtiAppendedInfo, PtiAppendedInfoCfg, PtiRadioConfig, PtiRadioInfo,
    PtiStatus0, RSSI_OFFSET,
};
pub use frame::{
    HW_RX_ABORT, HW_RX_START, HW_RX_SUCCESS, HW_TX_ABORT, HW_TX_START, HW_TX_SUCCESS, PtiFrame,
};
