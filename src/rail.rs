//! Static RAIL radio-region tables.
//!
//! RAIL describes each Z-Wave regulatory region as up to 4 predefined
//! channel slots, each pinning a center frequency and a data-rate class.
//! The table below mirrors the region definitions shipped with the radio
//! SDK; it is immutable and complete at compile time.

use serde::{Deserialize, Serialize};

/// RAIL region identifiers as carried in the PTI radio-config byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RailRegionId {
    /// Invalid region id in RAIL; still carries usable channel data.
    Inv = 0,
    Eu = 1,
    Us = 2,
    Anz = 3,
    Hk = 4,
    My = 5,
    In = 6,
    Jp = 7,
    Ru = 8,
    Il = 9,
    Kr = 10,
    Cn = 11,
    UsLr1 = 12,
    UsLr2 = 13,
    UsLr3 = 14,
    EuLr1 = 15,
    EuLr2 = 16,
    EuLr3 = 17,
}

impl RailRegionId {
    /// Resolve a raw 5-bit region id from the wire.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Inv),
            1 => Some(Self::Eu),
            2 => Some(Self::Us),
            3 => Some(Self::Anz),
            4 => Some(Self::Hk),
            5 => Some(Self::My),
            6 => Some(Self::In),
            7 => Some(Self::Jp),
            8 => Some(Self::Ru),
            9 => Some(Self::Il),
            10 => Some(Self::Kr),
            11 => Some(Self::Cn),
            12 => Some(Self::UsLr1),
            13 => Some(Self::UsLr2),
            14 => Some(Self::UsLr3),
            15 => Some(Self::EuLr1),
            16 => Some(Self::EuLr2),
            17 => Some(Self::EuLr3),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Inv => "INV",
            Self::Eu => "EU",
            Self::Us => "US",
            Self::Anz => "ANZ",
            Self::Hk => "HK",
            Self::My => "MY",
            Self::In => "IN",
            Self::Jp => "JP",
            Self::Ru => "RU",
            Self::Il => "IL",
            Self::Kr => "KR",
            Self::Cn => "CN",
            Self::UsLr1 => "US_LR1",
            Self::UsLr2 => "US_LR2",
            Self::UsLr3 => "US_LR3",
            Self::EuLr1 => "EU_LR1",
            Self::EuLr2 => "EU_LR2",
            Self::EuLr3 => "EU_LR3",
        }
    }

    /// RAIL 2-channel regions (Z-Wave LR end device).
    pub fn is_2ch(&self) -> bool {
        matches!(self, Self::UsLr3 | Self::EuLr3)
    }

    /// RAIL 4-channel regions (Z-Wave LR controller).
    pub fn is_4ch(&self) -> bool {
        matches!(self, Self::UsLr1 | Self::UsLr2 | Self::EuLr1 | Self::EuLr2)
    }

    /// RAIL 3-channel regions (Z-Wave classic).
    pub fn is_3ch(&self) -> bool {
        !self.is_2ch() && !self.is_4ch()
    }
}

/// Data-rate classes RAIL distinguishes per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailBaud {
    /// R1, 9.6 kbit/s.
    Baud9600,
    /// R2, 40 kbit/s.
    Baud40k,
    /// R3, 100 kbit/s.
    Baud100k,
    /// Long Range 100 kbit/s (RAIL tracks LR with its own value).
    Baud100kLr,
}

/// One predefined channel slot of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RailChannel {
    /// Center frequency in kHz.
    pub frequency_khz: u32,
    pub baud: RailBaud,
}

/// A region and its 4 channel slots; unused slots are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailRegion {
    pub id: RailRegionId,
    pub channels: [Option<RailChannel>; 4],
}

const fn ch(frequency_khz: u32, baud: RailBaud) -> Option<RailChannel> {
    Some(RailChannel { frequency_khz, baud })
}

use RailBaud::{Baud9600, Baud40k, Baud100k, Baud100kLr};

/// All RAIL Z-Wave regions, indexed by `RailRegionId as usize`.
pub static RAIL_REGIONS: [RailRegion; 18] = [
    RailRegion {
        id: RailRegionId::Inv,
        channels: [ch(916_000, Baud100k), ch(908_400, Baud40k), ch(908_420, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Eu,
        channels: [ch(869_850, Baud100k), ch(868_400, Baud40k), ch(868_420, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Us,
        channels: [ch(916_000, Baud100k), ch(908_400, Baud40k), ch(908_420, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Anz,
        channels: [ch(919_800, Baud100k), ch(921_400, Baud40k), ch(921_420, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Hk,
        channels: [ch(919_800, Baud100k), ch(919_800, Baud40k), ch(919_820, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::My,
        channels: [ch(919_800, Baud100k), ch(921_400, Baud40k), ch(921_420, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::In,
        channels: [ch(865_200, Baud100k), ch(865_200, Baud40k), ch(865_220, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Jp,
        channels: [ch(922_500, Baud100k), ch(923_900, Baud100k), ch(926_300, Baud100k), None],
    },
    RailRegion {
        id: RailRegionId::Ru,
        channels: [ch(869_000, Baud100k), ch(869_000, Baud40k), ch(869_020, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Il,
        channels: [ch(916_000, Baud100k), ch(916_000, Baud40k), ch(916_020, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::Kr,
        channels: [ch(920_900, Baud100k), ch(921_700, Baud100k), ch(923_100, Baud100k), None],
    },
    RailRegion {
        id: RailRegionId::Cn,
        channels: [ch(868_400, Baud100k), ch(868_400, Baud40k), ch(868_420, Baud9600), None],
    },
    RailRegion {
        id: RailRegionId::UsLr1,
        channels: [
            ch(916_000, Baud100k),
            ch(908_400, Baud40k),
            ch(908_420, Baud9600),
            ch(912_000, Baud100kLr),
        ],
    },
    RailRegion {
        id: RailRegionId::UsLr2,
        channels: [
            ch(916_000, Baud100k),
            ch(908_400, Baud40k),
            ch(908_420, Baud9600),
            ch(920_000, Baud100kLr),
        ],
    },
    RailRegion {
        id: RailRegionId::UsLr3,
        channels: [ch(912_000, Baud100kLr), ch(920_000, Baud100kLr), None, None],
    },
    RailRegion {
        id: RailRegionId::EuLr1,
        channels: [
            ch(869_850, Baud100k),
            ch(868_400, Baud40k),
            ch(868_420, Baud9600),
            ch(864_400, Baud100kLr),
        ],
    },
    RailRegion {
        id: RailRegionId::EuLr2,
        channels: [
            ch(869_850, Baud100k),
            ch(868_400, Baud40k),
            ch(868_420, Baud9600),
            ch(866_400, Baud100kLr),
        ],
    },
    RailRegion {
        id: RailRegionId::EuLr3,
        channels: [ch(864_400, Baud100kLr), ch(866_400, Baud100kLr), None, None],
    },
];

/// Look up a region's static definition.
pub fn region(id: RailRegionId) -> &'static RailRegion {
    &RAIL_REGIONS[id as usize]
}

/// Resolve a raw region id / channel number pair from a PTI frame to its
/// channel slot. `None` for unknown regions, out-of-range channel numbers,
/// and unused slots.
pub fn channel(region_id: u8, channel_number: u8) -> Option<RailChannel> {
    let region = region(RailRegionId::from_id(region_id)?);
    region.channels.get(channel_number as usize).copied().flatten()
}
