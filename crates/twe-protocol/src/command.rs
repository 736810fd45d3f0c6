//! Outbound write command encoding
//!
//! Write frames instruct a node to drive its digital and analog outputs.
//! Both shapes share a layout: device id, write command code, protocol
//! version, two digital bytes, four 16-bit analog values, then the
//! `X\r\n` tail. The analog form leaves the digital bytes at their
//! ignore placeholder; the digital form fills them with a level bitpack
//! and an addressed-channel bitpack and sets every analog value to the
//! 0xFFFF leave-unchanged placeholder.

use std::fmt::Write as _;

use crate::wire::{
    ANALOG_IGNORE, BROADCAST_ID, CHANNELS, CMD_WRITE, CR, DIGITAL_IGNORE, LF, PROTOCOL_VERSION,
    SKIP_CHECKSUM, WRITE_FRAME_LEN,
};

/// An outbound write command, ready to encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCommand {
    /// Drive PWM/analog outputs; a channel value of 0xFFFF is skipped
    Analog { device_id: u8, values: [u16; CHANNELS] },
    /// Drive digital outputs; only channels with their mask bit set
    /// participate in the write
    Digital {
        device_id: u8,
        levels: [bool; CHANNELS],
        mask: [bool; CHANNELS],
    },
}

fn bitpack(flags: [bool; CHANNELS]) -> u8 {
    flags
        .iter()
        .enumerate()
        .fold(0u8, |acc, (i, &on)| acc | (u8::from(on) << i))
}

impl WriteCommand {
    /// Analog write to a single channel, leaving the others unchanged
    pub fn analog_pin(device_id: u8, pin: usize, value: u16) -> Option<Self> {
        if pin >= CHANNELS {
            return None;
        }
        let mut values = [ANALOG_IGNORE; CHANNELS];
        values[pin] = value;
        Some(Self::Analog { device_id, values })
    }

    /// Analog write to every node on the network
    pub fn analog_broadcast(values: [u16; CHANNELS]) -> Self {
        Self::Analog {
            device_id: BROADCAST_ID,
            values,
        }
    }

    /// Digital write to a single channel; the mask addresses only `pin`
    pub fn digital_pin(device_id: u8, pin: usize, level: bool) -> Option<Self> {
        if pin >= CHANNELS {
            return None;
        }
        let mut levels = [false; CHANNELS];
        let mut mask = [false; CHANNELS];
        levels[pin] = level;
        mask[pin] = true;
        Some(Self::Digital {
            device_id,
            levels,
            mask,
        })
    }

    /// Digital write of all four channels to every node on the network
    pub fn digital_broadcast(levels: [bool; CHANNELS]) -> Self {
        Self::Digital {
            device_id: BROADCAST_ID,
            levels,
            mask: [true; CHANNELS],
        }
    }

    /// Render the frame to its exact wire form
    ///
    /// The ASCII text is 30 bytes; the module firmware consumes a fixed
    /// 31-byte command, so the frame carries one trailing NUL pad. The
    /// returned buffer is always exactly [`WRITE_FRAME_LEN`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        let (device_id, digital, mask, values) = match *self {
            Self::Analog { device_id, values } => {
                (device_id, DIGITAL_IGNORE, DIGITAL_IGNORE, values)
            }
            Self::Digital {
                device_id,
                levels,
                mask,
            } => (
                device_id,
                bitpack(levels),
                bitpack(mask),
                [ANALOG_IGNORE; CHANNELS],
            ),
        };

        let mut text = String::with_capacity(WRITE_FRAME_LEN);
        text.push(':');
        let _ = write!(text, "{:02X}", device_id);
        let _ = write!(text, "{:02X}", CMD_WRITE);
        let _ = write!(text, "{:02X}", PROTOCOL_VERSION);
        let _ = write!(text, "{:02X}", digital);
        let _ = write!(text, "{:02X}", mask);
        for v in values {
            let _ = write!(text, "{:04X}", v);
        }
        text.push(SKIP_CHECKSUM as char);
        text.push(CR as char);
        text.push(LF as char);

        let mut frame = text.into_bytes();
        frame.resize(WRITE_FRAME_LEN, 0);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::decode_hex_pairs;

    #[test]
    fn analog_frame_renders_fixed_width_uppercase_hex() {
        let frame = WriteCommand::Analog {
            device_id: 0x01,
            values: [0x0400, 0x000A, 0xFFFF, 0x0000],
        }
        .encode();

        assert_eq!(frame.len(), WRITE_FRAME_LEN);
        assert_eq!(&frame[..11], b":0180010000");
        assert_eq!(&frame[11..27], b"0400000AFFFF0000");
        assert_eq!(&frame[27..], &[SKIP_CHECKSUM, CR, LF, 0x00]);
    }

    #[test]
    fn digital_pin_round_trips_through_the_codec() {
        let frame = WriteCommand::digital_pin(0x01, 2, true).unwrap().encode();

        // Strip sentinel and the X\r\n + pad tail before hex-decoding
        let bytes = decode_hex_pairs(&frame[1..27]);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[1], CMD_WRITE);
        assert_eq!(bytes[2], PROTOCOL_VERSION);
        assert_eq!(bytes[3], 0x04, "level bitpack for channel 2");
        assert_eq!(bytes[4], 0x04, "addressed-channel bitpack");
        assert_eq!(&bytes[5..13], &[0xFF; 8]);
    }

    #[test]
    fn broadcast_analog_pin_fills_other_channels_with_ignore() {
        let cmd = WriteCommand::analog_pin(BROADCAST_ID, 0, 1024).unwrap();
        let frame = cmd.encode();
        let text = std::str::from_utf8(&frame[..frame.len() - 1]).unwrap();

        assert!(text.starts_with(":7880"));
        assert!(text.contains("0400FFFFFFFFFFFF"));
    }

    #[test]
    fn out_of_range_pin_is_rejected() {
        assert!(WriteCommand::analog_pin(0x01, 4, 100).is_none());
        assert!(WriteCommand::digital_pin(0x01, 7, true).is_none());
    }

    #[test]
    fn tail_is_skip_marker_cr_lf_pad() {
        let frame = WriteCommand::digital_broadcast([true; 4]).encode();
        assert_eq!(frame.len(), WRITE_FRAME_LEN);
        assert_eq!(&frame[27..], &[SKIP_CHECKSUM, CR, LF, 0x00]);
    }
}
