//! Inbound frame decoding
//!
//! A frame payload is the ASCII-hex text between the `:` sentinel and the
//! `\r` terminator, both already stripped by the synchronizer. Decoding
//! parses the hex pairs, verifies the zero checksum and, for report
//! frames, extracts the fixed-offset fields into a [`DeviceState`].
//!
//! Receive-side checksumming is unconditional. The `X` marker that this
//! library emits at the end of its own outbound frames tells the *module*
//! to skip verification; nothing on the receive path interprets it.

use crate::error::FrameError;
use crate::state::DeviceState;
use crate::wire::{CHANNELS, CMD_REPORT, REPORT_MIN_LEN};

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Report frame (command 0x81), carries a full node snapshot
    Report(DeviceState),
    /// Any other checksum-valid frame, e.g. a write acknowledgement;
    /// decoded but never applied to the device table
    Other { command_code: u8, bytes: Vec<u8> },
}

/// Parse ASCII hex pairs into raw bytes
///
/// The scan stops at the first incomplete or non-hex pair, yielding a
/// short result; callers are expected to length-check before indexing.
pub fn decode_hex_pairs(ascii: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(ascii.len() / 2);
    for pair in ascii.chunks(2) {
        if pair.len() < 2 {
            break;
        }
        let Ok(text) = std::str::from_utf8(pair) else {
            break;
        };
        let Ok(byte) = u8::from_str_radix(text, 16) else {
            break;
        };
        bytes.push(byte);
    }
    bytes
}

/// Wrapping byte sum; a well-formed frame sums to zero
fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Decode one delimited frame payload
///
/// Fails closed: a short or corrupt payload never yields a partial
/// [`DeviceState`].
pub fn decode_frame(ascii: &[u8]) -> Result<InboundFrame, FrameError> {
    let bytes = decode_hex_pairs(ascii);
    if bytes.len() < 2 {
        return Err(FrameError::TooShort { len: bytes.len() });
    }

    let sum = checksum(&bytes);
    if sum != 0 {
        return Err(FrameError::ChecksumMismatch {
            sum,
            raw: String::from_utf8_lossy(ascii).into_owned(),
        });
    }

    let command_code = bytes[1];
    if command_code != CMD_REPORT {
        return Ok(InboundFrame::Other {
            command_code,
            bytes,
        });
    }
    if bytes.len() < REPORT_MIN_LEN {
        return Err(FrameError::TooShort { len: bytes.len() });
    }

    Ok(InboundFrame::Report(parse_report(&bytes)))
}

/// Extract the fixed-offset report fields
///
/// Offset 9 is unused by the layout, and no offset maps to
/// `destination_id`; it stays at its default of zero.
fn parse_report(bytes: &[u8]) -> DeviceState {
    let mut state = DeviceState {
        device_id: bytes[0],
        command_code: bytes[1],
        packet_identifier: bytes[2],
        protocol_version: bytes[3],
        link_quality: (bytes[4] as f32 * 7.0 - 1970.0) / 20.0,
        serial_identifier: u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]),
        timestamp: u16::from_be_bytes([bytes[10], bytes[11]]),
        relay_flag: bytes[12] != 0,
        power_voltage_mv: u16::from_be_bytes([bytes[13], bytes[14]]),
        ..Default::default()
    };

    for i in 0..CHANNELS {
        state.digital_input[i] = (bytes[15] >> i) & 1 == 1;
        state.digital_change[i] = (bytes[16] >> i) & 1 == 1;
    }

    let fraction = bytes[21];
    for i in 0..CHANNELS {
        state.analog_input[i] = (bytes[17 + i] as i32 * 4 + fraction as i32) * 4;
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hex-encode raw bytes the way a module would put them on the wire
    fn to_ascii(bytes: &[u8]) -> Vec<u8> {
        bytes.iter().flat_map(|b| format!("{:02X}", b).into_bytes()).collect()
    }

    /// Append the byte that makes the frame sum to zero
    fn with_checksum(mut bytes: Vec<u8>) -> Vec<u8> {
        let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        bytes.push(sum.wrapping_neg());
        bytes
    }

    fn sample_report_bytes() -> Vec<u8> {
        with_checksum(vec![
            0x01, 0x81, 0x00, 0x01, 0x8C, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x00,
            0x0C, 0x05, 0x00, 0x32, 0x32, 0x32, 0x32, 0x00,
        ])
    }

    #[test]
    fn report_frame_populates_every_field() {
        let frame = decode_frame(&to_ascii(&sample_report_bytes())).unwrap();
        let InboundFrame::Report(state) = frame else {
            panic!("expected a report frame");
        };

        assert_eq!(state.device_id, 0x01);
        assert_eq!(state.command_code, 0x81);
        assert_eq!(state.packet_identifier, 0x00);
        assert_eq!(state.protocol_version, 0x01);
        assert_eq!(state.link_quality, (0x8C as f32 * 7.0 - 1970.0) / 20.0);
        assert_eq!(state.serial_identifier, 0x0000_0001);
        assert_eq!(state.destination_id, 0);
        assert_eq!(state.timestamp, 0x0005);
        assert!(!state.relay_flag);
        assert_eq!(state.power_voltage_mv, 0x000C);
        assert_eq!(state.digital_input, [true, false, true, false]);
        assert_eq!(state.digital_change, [false; 4]);
        assert_eq!(state.analog_input, [200; 4]);
    }

    #[test]
    fn nonzero_checksum_is_rejected() {
        let mut bytes = sample_report_bytes();
        *bytes.last_mut().unwrap() ^= 0xFF;

        let err = decode_frame(&to_ascii(&bytes)).unwrap_err();
        assert!(matches!(err, FrameError::ChecksumMismatch { sum, .. } if sum != 0));
    }

    #[test]
    fn checksum_error_carries_the_raw_buffer() {
        let ascii = to_ascii(&[0x01, 0x81, 0x55]);
        let err = decode_frame(&ascii).unwrap_err();
        assert_eq!(
            err,
            FrameError::ChecksumMismatch {
                sum: 0xD7,
                raw: "018155".to_string()
            }
        );
    }

    #[test]
    fn short_report_fails_closed() {
        // Valid checksum but only 4 decoded bytes
        let bytes = with_checksum(vec![0x01, 0x81, 0x00]);
        let err = decode_frame(&to_ascii(&bytes)).unwrap_err();
        assert_eq!(err, FrameError::TooShort { len: 4 });
    }

    #[test]
    fn non_report_command_decodes_without_state() {
        // Write acknowledgements use other command codes
        let bytes = with_checksum(vec![0x01, 0x8A, 0x02, 0x03]);
        let frame = decode_frame(&to_ascii(&bytes)).unwrap();
        assert!(matches!(
            frame,
            InboundFrame::Other { command_code: 0x8A, .. }
        ));
    }

    #[test]
    fn hex_scan_stops_at_invalid_pair() {
        assert_eq!(decode_hex_pairs(b"0181ZZ42"), vec![0x01, 0x81]);
        assert_eq!(decode_hex_pairs(b"018"), vec![0x01]);
        assert_eq!(decode_hex_pairs(b""), Vec::<u8>::new());
    }

    #[test]
    fn empty_payload_is_too_short() {
        assert_eq!(
            decode_frame(b"").unwrap_err(),
            FrameError::TooShort { len: 0 }
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
                prop_assert_eq!(decode_hex_pairs(&to_ascii(&bytes)), bytes);
            }

            #[test]
            fn balanced_non_report_frames_decode_as_other(
                id: u8,
                data in prop::collection::vec(any::<u8>(), 0..28)
            ) {
                let mut body = vec![id, 0x8A];
                body.extend(data);
                let bytes = with_checksum(body);
                let frame = decode_frame(&to_ascii(&bytes)).unwrap();
                prop_assert!(
                    matches!(
                        frame,
                        InboundFrame::Other { command_code: 0x8A, .. }
                    ),
                    "expected InboundFrame::Other with command_code 0x8A"
                );
            }
        }
    }
}
