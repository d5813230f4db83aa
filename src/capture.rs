//! Live PTI capture worker.
//!
//! One worker owns one trace source: it reads raw chunks from the board's
//! DCH socket and fans each chunk out to a pair of output files — the raw
//! bytes go to a ZLF file verbatim, the decoded frames go to a pcap file.
//! A chunk that fails to decode is skipped for pcap but still lands in the
//! ZLF file, so the capture stays lossless.
//!
//! Shutdown is cooperative: [`CaptureHandle::stop`] cancels the worker's
//! token and joins it; no in-flight chunk is interrupted mid-write.

use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dch::DchPacket;
use crate::pcap::PcapWriter;
use crate::zlf::ZlfWriter;
use crate::{Result, TraceError};

/// Default TCP port of the DCH trace stream on adapter boards.
pub const DEFAULT_DCH_PORT: u16 = 4905;

/// Largest chunk a single socket read can deliver.
const READ_BUFFER_SIZE: usize = 2048;

/// Configuration for one capture worker.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Adapter board hostname or address.
    pub host: String,
    /// DCH trace port, [`DEFAULT_DCH_PORT`] unless the board is remapped.
    pub port: u16,
    /// Destination for the raw ZLF trace.
    pub zlf_path: PathBuf,
    /// Destination for the decoded pcap trace.
    pub pcap_path: PathBuf,
    /// Capture-start wall clock in microseconds since the Unix epoch, offset
    /// so that board timestamps (which count from boot) become absolute.
    /// Computed once at setup and read-only afterwards.
    pub reference_time_us: u64,
}

impl CaptureConfig {
    pub fn new(
        host: impl Into<String>,
        zlf_path: impl Into<PathBuf>,
        pcap_path: impl Into<PathBuf>,
        reference_time_us: u64,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_DCH_PORT,
            zlf_path: zlf_path.into(),
            pcap_path: pcap_path.into(),
            reference_time_us,
        }
    }
}

/// Counters reported by a finished capture worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptureStats {
    /// Raw chunks appended to the ZLF file.
    pub chunks: u64,
    /// Decoded frames appended to the pcap file.
    pub frames: u64,
    /// Chunks that failed to decode and were skipped for pcap.
    pub skipped: u64,
}

/// Handle to a running capture worker.
pub struct CaptureHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<CaptureStats>>,
}

impl CaptureHandle {
    /// Request cooperative shutdown and wait for the worker to finish.
    pub async fn stop(self) -> Result<CaptureStats> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| TraceError::connection_failed(format!("capture task failed: {e}")))?
    }

    /// Token observed by the worker; cancelling it stops the capture.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Entry point for live PTI capture.
pub struct PtiCapture;

impl PtiCapture {
    /// Connect to the trace socket, create both output files, and spawn the
    /// capture worker.
    pub async fn start(config: CaptureConfig) -> Result<CaptureHandle> {
        let stream = TcpStream::connect((config.host.as_str(), config.port))
            .await
            .map_err(|e| {
                TraceError::connection_failed_with_source(
                    format!("{}:{}", config.host, config.port),
                    Box::new(e),
                )
            })?;

        let zlf = ZlfWriter::create(&config.zlf_path)?;
        let pcap = PcapWriter::create(&config.pcap_path)?;

        info!(
            host = %config.host,
            port = config.port,
            zlf = %config.zlf_path.display(),
            pcap = %config.pcap_path.display(),
            "PTI capture started"
        );

        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let reference_time_us = config.reference_time_us;
        let task = tokio::spawn(async move {
            capture_task(stream, zlf, pcap, reference_time_us, worker_cancel).await
        });

        Ok(CaptureHandle { cancel, task })
    }
}

async fn capture_task(
    mut stream: TcpStream,
    mut zlf: ZlfWriter,
    mut pcap: PcapWriter,
    reference_time_us: u64,
    cancel: CancellationToken,
) -> Result<CaptureStats> {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut stats = CaptureStats::default();

    loop {
        // drain data already delivered before honoring cancellation, so a
        // stop request never discards chunks the board already sent
        let n = tokio::select! {
            biased;
            read = stream.read(&mut buf) => read.map_err(|e| {
                TraceError::connection_failed_with_source("trace socket read", Box::new(e))
            })?,
            _ = cancel.cancelled() => {
                info!("capture cancelled");
                break;
            }
        };

        if n == 0 {
            info!("trace stream closed by peer");
            break;
        }

        let chunk = &buf[..n];
        zlf.append_chunk(chunk)?;
        stats.chunks += 1;

        match DchPacket::decode(chunk) {
            Some(packet) => {
                pcap.append(&packet, reference_time_us)?;
                stats.frames += packet.frames.len() as u64;
                debug!(frames = packet.frames.len(), "captured DCH packet");
            }
            None => {
                stats.skipped += 1;
                warn!(len = n, "chunk could not be parsed and was skipped");
            }
        }
    }

    info!(
        chunks = stats.chunks,
        frames = stats.frames,
        skipped = stats.skipped,
        "capture finished"
    );
    Ok(stats)
}
