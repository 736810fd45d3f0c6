//! Serial transport abstraction
//!
//! The reader task and the write API talk to the port through the
//! [`Transport`] trait so tests can substitute a scripted byte source.
//! The production implementation wraps a blocking `serialport` handle
//! with non-blocking poll semantics.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::error::LinkError;

/// Read timeout for the underlying port. Reads only happen after a
/// successful availability poll, so this is a safety net, not a pace.
const READ_TIMEOUT: Duration = Duration::from_millis(10);

/// Byte-level access to the serial coordinator
pub trait Transport: Send {
    /// Non-blocking check for buffered inbound data
    fn byte_available(&mut self) -> bool;

    /// Consume one inbound byte; `None` when nothing is ready
    fn read_byte(&mut self) -> Option<u8>;

    /// Write a complete outbound frame
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
}

/// [`Transport`] backed by a real serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path` at the given baud rate (TWELite coordinators run at
    /// 115200 by default)
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| LinkError::OpenFailed {
                port: path.to_string(),
                source,
            })?;
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn byte_available(&mut self) -> bool {
        self.port.bytes_to_read().map(|n| n > 0).unwrap_or(false)
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => None,
            Err(e) => {
                debug!("serial read error: {}", e);
                None
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }
}
