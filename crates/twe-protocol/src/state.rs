//! Most-recent state record for one TWELite node

use std::fmt;

use crate::wire::CHANNELS;

/// Snapshot of a node's last report frame
///
/// One record exists per observed device identifier; every valid report
/// frame replaces the record wholesale. All fields come straight from the
/// report layout except the derived [`link_quality`](Self::link_quality)
/// and [`analog_input`](Self::analog_input) values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceState {
    /// Source address of the report (table key)
    pub device_id: u8,
    /// Command code of the frame that produced this record (always 0x81)
    pub command_code: u8,
    /// Rolling packet identifier, opaque pass-through
    pub packet_identifier: u8,
    /// Protocol version byte, opaque pass-through
    pub protocol_version: u8,
    /// Received signal quality in dBm-like units, derived from one raw
    /// byte as `(raw*7 - 1970)/20.0`; typically negative
    pub link_quality: f32,
    /// 32-bit module serial, four raw bytes big-endian
    pub serial_identifier: u32,
    /// Declared by the frame layout but never assigned by any offset in
    /// the current report format; always left at zero
    pub destination_id: u8,
    /// 16-bit big-endian timestamp counter
    pub timestamp: u16,
    /// Set when the frame arrived through a repeater
    pub relay_flag: bool,
    /// Module supply voltage in millivolts
    pub power_voltage_mv: u16,
    /// Digital input levels, bit i of the raw byte maps to channel i
    pub digital_input: [bool; CHANNELS],
    /// Per-channel "changed since last report" flags, same bit mapping
    pub digital_change: [bool; CHANNELS],
    /// Analog readings in millivolts, `(raw*4 + fraction)*4` per channel
    pub analog_input: [i32; CHANNELS],
}

fn level(v: bool) -> &'static str {
    if v {
        "HIGH"
    } else {
        "LOW"
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "device id        : {:02X}", self.device_id)?;
        writeln!(f, "command          : {:02X}", self.command_code)?;
        writeln!(f, "packet identifier: {:02X}", self.packet_identifier)?;
        writeln!(f, "protocol version : {:02X}", self.protocol_version)?;
        writeln!(f, "link quality     : {} (dBm)", self.link_quality)?;
        writeln!(f, "serial identifier: {:08X}", self.serial_identifier)?;
        writeln!(f, "destination id   : {:02X}", self.destination_id)?;
        writeln!(f, "time stamp       : {:04X}", self.timestamp)?;
        writeln!(f, "relay flag       : {:02X}", u8::from(self.relay_flag))?;
        writeln!(f, "power voltage    : {} (mV)", self.power_voltage_mv)?;
        writeln!(
            f,
            "digital input    : {}, {}, {}, {}",
            level(self.digital_input[0]),
            level(self.digital_input[1]),
            level(self.digital_input[2]),
            level(self.digital_input[3]),
        )?;
        writeln!(
            f,
            "digital change   : {}, {}, {}, {}",
            level(self.digital_change[0]),
            level(self.digital_change[1]),
            level(self.digital_change[2]),
            level(self.digital_change[3]),
        )?;
        writeln!(
            f,
            "analog input     : {}, {}, {}, {} (mV)",
            self.analog_input[0], self.analog_input[1], self.analog_input[2], self.analog_input[3],
        )
    }
}
