//! Error types for the serial bridge

use thiserror::Error;

/// Errors surfaced to the host application
///
/// Protocol-level problems (malformed frames, checksum mismatches) are
/// handled inside the reader and never propagate; only transport setup
/// failures are user-visible.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The serial port could not be opened
    #[error("failed to open serial port {port}: {source}")]
    OpenFailed {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Listing the available serial ports failed
    #[error("port enumeration failed: {0}")]
    EnumerationFailed(String),
}
