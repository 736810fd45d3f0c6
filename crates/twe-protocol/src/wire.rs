//! Wire-level constants for the TWELite standard-app serial protocol

/// Frame start sentinel
pub const HEAD_MARKER: u8 = b':';
/// Frame terminator; decoding happens when this byte arrives
pub const CR: u8 = b'\r';
/// Cosmetic line feed sent after the terminator, not required for sync
pub const LF: u8 = b'\n';
/// Skip-checksum marker emitted at the end of outbound frames
pub const SKIP_CHECKSUM: u8 = b'X';

/// Outbound write command code
pub const CMD_WRITE: u8 = 0x80;
/// Inbound read/report command code; the only code that updates state
pub const CMD_REPORT: u8 = 0x81;
/// Protocol version byte carried in every write frame
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Exact byte count of an outbound write frame on the wire
pub const WRITE_FRAME_LEN: usize = 31;
/// Maximum payload length of an inbound frame; the synchronizer resets
/// its buffer past this to recover from a missing terminator
pub const READ_FRAME_MAX_LEN: usize = 51;
/// Minimum decoded byte count of a report frame (highest offset used is 21)
pub const REPORT_MIN_LEN: usize = 22;

/// 16-bit placeholder meaning "leave this analog channel unchanged"
pub const ANALOG_IGNORE: u16 = 0xFFFF;
/// Placeholder byte for the digital fields of an analog-only write
pub const DIGITAL_IGNORE: u8 = 0x00;
/// Largest accepted analog write value
pub const ANALOG_WRITE_MAX: u16 = 0x0400;

/// Broadcast device identifier (all nodes)
pub const BROADCAST_ID: u8 = 0x78;
/// Highest assignable unicast device identifier
pub const MAX_UNICAST_ID: u8 = 0x64;
/// Reserved identifier for repeater nodes
pub const REPEATER_ID: u8 = 0x7A;

/// Digital and analog channels per node
pub const CHANNELS: usize = 4;
