//! Frame boundary detection over a raw byte stream
//!
//! The synchronizer is a single accumulating buffer driven one byte at a
//! time as data arrives from the serial port. A start sentinel discards
//! any partially accumulated frame, a carriage return emits the buffered
//! payload for decoding, and an over-long buffer is cleared so a port
//! that never sends a terminator cannot grow the buffer without bound.

use crate::wire::{CR, HEAD_MARKER, READ_FRAME_MAX_LEN};

/// Streaming frame synchronizer
///
/// Owns no transport; `twe-link` feeds it bytes under its read lock. It
/// has no terminal state and lives for the whole connection.
#[derive(Debug, Default)]
pub struct FrameSynchronizer {
    buffer: Vec<u8>,
}

impl FrameSynchronizer {
    /// Create a synchronizer with an empty accumulation buffer
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(READ_FRAME_MAX_LEN),
        }
    }

    /// Consume one byte; returns a complete frame payload on `\r`
    ///
    /// The returned payload is the ASCII between sentinel and terminator,
    /// ready for [`decode_frame`](crate::decode_frame).
    pub fn push_byte(&mut self, byte: u8) -> Option<Vec<u8>> {
        if byte == HEAD_MARKER {
            self.buffer.clear();
            None
        } else if self.buffer.len() > READ_FRAME_MAX_LEN {
            tracing::warn!(len = self.buffer.len(), "unterminated frame, resyncing");
            self.buffer.clear();
            None
        } else if byte == CR {
            Some(std::mem::take(&mut self.buffer))
        } else {
            self.buffer.push(byte);
            None
        }
    }

    /// Discard any partially accumulated frame
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
