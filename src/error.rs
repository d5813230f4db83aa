//! Error types for trace capture and conversion.
//!
//! Malformed *frames* are not errors: the wire codecs return `Option` and the
//! caller drops the offending chunk and moves on. `TraceError` covers the
//! cases that must surface — file and socket failures, corrupt container
//! headers, and internal invariants (an unknown region/channel combination
//! while encoding, an unknown TLV tag while reading back).
//!
//! ## Recovery
//!
//! Errors classify themselves via [`TraceError::is_retryable`]: connection
//! failures are worth retrying from the orchestration layer, everything else
//! indicates bad data or a logic defect and is not.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for trace operations.
pub type Result<T, E = TraceError> = std::result::Result<T, E>;

/// Main error type for trace capture and conversion.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    #[error("trace file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} header in {path}: {details}")]
    Header { format: &'static str, path: PathBuf, details: String },

    #[error("parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("radio region {region} has no channel {channel}")]
    UnknownChannel { region: u8, channel: u8 },

    #[error("capture connection failed: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TraceError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TraceError::Connection { .. } => true,
            TraceError::File { .. } => false,
            TraceError::Header { .. } => false,
            TraceError::Parse { .. } => false,
            TraceError::UnknownChannel { .. } => false,
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TraceError::File { path: path.into(), source }
    }

    /// Helper constructor for container header validation failures.
    pub fn header_error(
        format: &'static str,
        path: impl Into<PathBuf>,
        details: impl Into<String>,
    ) -> Self {
        TraceError::Header { format, path: path.into(), details: details.into() }
    }

    /// Helper constructor for record-level parse failures.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TraceError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        TraceError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TraceError::Connection { reason: reason.into(), source: Some(source) }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        TraceError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
