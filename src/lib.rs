//! Type-safe Rust library for Z-Wave PTI radio trace capture and conversion.
//!
//! `zwtrace` decodes the DCH chunk stream that Z-Wave adapter boards emit on
//! their debug port, extracts the embedded PTI radio-diagnostic frames, and
//! persists captures in two container formats:
//!
//! - **ZLF** — the sniffer trace format, recording the raw chunks verbatim
//! - **PCAP** — classic packet capture with the Z-Wave TAP encapsulation
//!   (link type 297), carrying decoded radio metadata per frame
//!
//! All three wire formats round-trip byte-exactly: `decode` followed by
//! `encode` reproduces the original bytes, which is what downstream trace
//! viewers depend on.
//!
//! # Quick start
//!
//! ## Live capture
//!
//! ```rust,no_run
//! use zwtrace::{CaptureConfig, ZwTrace};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> zwtrace::Result<()> {
//!     let config = CaptureConfig::new("wpk-01", "trace.zlf", "trace.pcap", 1_700_000_000_000_000);
//!     let handle = ZwTrace::capture(config).await?;
//!     // ... run the test scenario ...
//!     let stats = handle.stop().await?;
//!     println!("captured {} frames", stats.frames);
//!     Ok(())
//! }
//! ```
//!
//! ## Reading a trace back
//!
//! ```rust,no_run
//! use zwtrace::ZwTrace;
//!
//! fn dump() -> zwtrace::Result<()> {
//!     let mut reader = ZwTrace::open_zlf("trace.zlf")?;
//!     while let Some(packet) = reader.next_packet() {
//!         for frame in &packet.frames {
//!             println!("seq {} at {} us", frame.header.sequence_number(), frame.header.timestamp_us());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod dch;
mod error;
pub mod pcap;
pub mod pti;
pub mod rail;
pub mod zlf;

pub use error::{Result, TraceError};

pub use capture::{CaptureConfig, CaptureHandle, CaptureStats, DEFAULT_DCH_PORT, PtiCapture};
pub use dch::{DchFrame, DchHeader, DchPacket, DchType};
pub use pcap::{LINKTYPE_ZWAVE_TAP, PcapReader, PcapWriter, TapRecord};
pub use pti::{PtiAppendedInfo, PtiFrame};
pub use rail::{RailBaud, RailChannel, RailRegion, RailRegionId};
pub use zlf::{ZlfChunk, ZlfReader, ZlfWriter};

/// Unified entry point for trace capture and trace file access.
pub struct ZwTrace;

impl ZwTrace {
    /// Start a live capture from a board's DCH trace socket.
    ///
    /// Spawns a worker that mirrors every received chunk into the configured
    /// ZLF and pcap files until the returned handle is stopped.
    pub async fn capture(config: CaptureConfig) -> Result<CaptureHandle> {
        PtiCapture::start(config).await
    }

    /// Open a ZLF trace file for sequential reading.
    pub fn open_zlf<P: AsRef<std::path::Path>>(path: P) -> Result<ZlfReader> {
        ZlfReader::open(path)
    }

    /// Open a Z-Wave TAP pcap file for sequential reading.
    pub fn open_pcap<P: AsRef<std::path::Path>>(path: P) -> Result<PcapReader> {
        PcapReader::open(path)
    }
}
