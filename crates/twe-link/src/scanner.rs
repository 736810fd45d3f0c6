//! Serial port enumeration
//!
//! Lists candidate ports for a TWELite coordinator. MONOSTICK and
//! TWE-Lite-R adapters enumerate as FTDI USB serial devices, so the
//! scanner also exposes a cheap VID-based hint for picking a default.

use serialport::{available_ports, SerialPortType};
use tracing::info;

use crate::error::LinkError;

/// FTDI's USB vendor id; all stock TWELite USB adapters use FTDI bridges
const FTDI_VID: u16 = 0x0403;

/// Pseudo-ports that are never a coordinator
const SKIP_PATTERNS: &[&str] = &["Bluetooth", "debug"];

/// Information about one available serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    /// USB Vendor ID (if USB)
    pub vid: Option<u16>,
    /// USB Product ID (if USB)
    pub pid: Option<u16>,
    /// USB serial number (if available)
    pub serial_number: Option<String>,
    /// USB product string
    pub product: Option<String>,
}

impl PortInfo {
    fn from_serialport(name: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                port: name,
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                serial_number: usb.serial_number.clone(),
                product: usb.product.clone(),
            },
            _ => Self {
                port: name,
                vid: None,
                pid: None,
                serial_number: None,
                product: None,
            },
        }
    }

    /// Heuristic: does this look like a TWELite USB adapter?
    pub fn looks_like_twelite(&self) -> bool {
        match (self.vid, self.product.as_deref()) {
            (_, Some(p)) if p.contains("MONOSTICK") || p.contains("TWE") => true,
            (Some(FTDI_VID), _) => true,
            _ => false,
        }
    }
}

/// Enumerate all available serial ports, skipping pseudo-ports
pub fn enumerate_ports() -> Result<Vec<PortInfo>, LinkError> {
    let ports = available_ports().map_err(|e| LinkError::EnumerationFailed(e.to_string()))?;

    let result: Vec<_> = ports
        .into_iter()
        .map(|p| PortInfo::from_serialport(p.port_name, &p.port_type))
        .filter(|p| !SKIP_PATTERNS.iter().any(|pat| p.port.contains(pat)))
        .collect();

    if result.is_empty() {
        info!("No serial ports found");
    } else {
        info!("Found {} serial port(s)", result.len());
        for port in &result {
            let desc = port.product.as_deref().unwrap_or("Unknown");
            info!("  {} - {}", port.port, desc);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    #[test]
    fn ftdi_adapter_is_a_twelite_candidate() {
        let usb_info = SerialPortType::UsbPort(UsbPortInfo {
            vid: FTDI_VID,
            pid: 0x6001,
            serial_number: Some("MW12345".to_string()),
            manufacturer: Some("MONO WIRELESS".to_string()),
            product: Some("MONOSTICK".to_string()),
        });

        let info = PortInfo::from_serialport("/dev/ttyUSB0".to_string(), &usb_info);

        assert_eq!(info.vid, Some(FTDI_VID));
        assert!(info.looks_like_twelite());
    }

    #[test]
    fn non_usb_port_is_not_a_candidate() {
        let info = PortInfo::from_serialport("/dev/ttyS0".to_string(), &SerialPortType::Unknown);
        assert!(!info.looks_like_twelite());
    }
}
