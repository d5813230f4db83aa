//! Z-Wave TAP link-layer enumerations and the RAIL-to-TAP mappings.
//!
//! The TAP encapsulation uses its own region and data-rate code spaces; the
//! region codes follow the Z-Wave RF-region numbering rather than RAIL's.

use serde::{Deserialize, Serialize};

use crate::rail::{RailBaud, RailRegionId};

/// TAP data-rate codes for the RF-info TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TapDataRate {
    R1 = 1,
    R2 = 2,
    R3 = 3,
}

impl TapDataRate {
    pub fn from_wire(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::R1),
            2 => Some(Self::R2),
            3 => Some(Self::R3),
            _ => None,
        }
    }
}

/// TAP region code for the RF-info TLV.
pub fn region_code(region: RailRegionId) -> u16 {
    match region {
        RailRegionId::Eu => 0x00,
        RailRegionId::Us => 0x01,
        RailRegionId::Anz => 0x02,
        RailRegionId::Hk => 0x03,
        RailRegionId::My => 0x04,
        RailRegionId::In => 0x05,
        RailRegionId::Il => 0x06,
        RailRegionId::Ru => 0x07,
        RailRegionId::Cn => 0x08,
        RailRegionId::UsLr1 => 0x09,
        RailRegionId::UsLr2 => 0x0A,
        RailRegionId::EuLr1 => 0x0B,
        RailRegionId::EuLr2 => 0x0C,
        RailRegionId::Jp => 0x20,
        RailRegionId::Kr => 0x21,
        RailRegionId::UsLr3 => 0x30,
        RailRegionId::EuLr3 => 0x31,
        RailRegionId::Inv => 0xFE,
    }
}

/// TAP data-rate code for a RAIL data-rate class; Long Range runs at the R3
/// rate.
pub fn data_rate(baud: RailBaud) -> TapDataRate {
    match baud {
        RailBaud::Baud9600 => TapDataRate::R1,
        RailBaud::Baud40k => TapDataRate::R2,
        RailBaud::Baud100k | RailBaud::Baud100kLr => TapDataRate::R3,
    }
}

/// FCS width class for the checksum TLV: R3 frames carry a 2-byte CRC,
/// slower rates a 1-byte checksum.
pub fn fcs_type(rate: TapDataRate) -> u8 {
    if rate == TapDataRate::R3 { 2 } else { 1 }
}
