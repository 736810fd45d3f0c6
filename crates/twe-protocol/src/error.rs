//! Error types for TWELite frame decoding

use thiserror::Error;

/// Errors that can occur while decoding an inbound frame
///
/// All of these are non-fatal: the reader drops the frame and resumes at
/// the next start sentinel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Frame decoded to fewer bytes than its layout requires
    #[error("frame too short: {len} decoded bytes")]
    TooShort { len: usize },

    /// Decoded bytes did not sum to zero modulo 256
    #[error("checksum mismatch: sum 0x{sum:02X} for frame {raw:?}")]
    ChecksumMismatch { sum: u8, raw: String },
}
