//! TWELite Protocol Library
//!
//! This crate provides framing, decoding and encoding for the TWELite
//! standard-app serial protocol: line-oriented ASCII-hex frames exchanged
//! with a MONOSTICK/TWE-Lite-R coordinator.
//!
//! # Format
//! - Frames start with `:` and end with `\r` (a cosmetic `\n` follows)
//! - Each protocol byte is two uppercase hex characters
//! - Inbound report frames (command `0x81`) carry a node's full sensor
//!   snapshot and must sum to zero modulo 256
//! - Outbound write frames (command `0x80`) set digital/analog outputs and
//!   end with the `X` skip-checksum marker
//!
//! # Architecture
//! [`FrameSynchronizer`] turns a raw byte stream into delimited ASCII
//! payloads, [`decode_frame`] turns one payload into an [`InboundFrame`],
//! and [`WriteCommand`] renders outbound frames. None of this does I/O;
//! the serial side lives in `twe-link`.
//!
//! # Example
//!
//! ```rust
//! use twe_protocol::{FrameSynchronizer, decode_frame, InboundFrame};
//!
//! let mut sync = FrameSynchronizer::new();
//! let mut states = Vec::new();
//! for &b in b":018100018C0000000100000500000C0500323232320012\r\n" {
//!     if let Some(payload) = sync.push_byte(b) {
//!         if let Ok(InboundFrame::Report(state)) = decode_frame(&payload) {
//!             states.push(state);
//!         }
//!     }
//! }
//! assert_eq!(states.len(), 1);
//! assert_eq!(states[0].device_id, 0x01);
//! ```

pub mod command;
pub mod error;
pub mod frame;
pub mod state;
pub mod sync;
pub mod wire;

pub use command::WriteCommand;
pub use error::FrameError;
pub use frame::{decode_frame, decode_hex_pairs, InboundFrame};
pub use state::DeviceState;
pub use sync::FrameSynchronizer;
pub use wire::{
    ANALOG_IGNORE, ANALOG_WRITE_MAX, BROADCAST_ID, CHANNELS, CMD_REPORT, CMD_WRITE, CR,
    DIGITAL_IGNORE, HEAD_MARKER, LF, MAX_UNICAST_ID, PROTOCOL_VERSION, READ_FRAME_MAX_LEN,
    REPEATER_ID, REPORT_MIN_LEN, SKIP_CHECKSUM, WRITE_FRAME_LEN,
};
