//! TWELite Serial Bridge Library
//!
//! This crate connects an application to a network of TWELite
//! sensor/actuator nodes through the serial coordinator (MONOSTICK or
//! TWE-Lite-R). It owns the serial port, runs a background reader that
//! keeps a per-device state table current, and exposes fire-and-forget
//! digital/analog write commands.
//!
//! # Architecture
//!
//! ```text
//! serial bytes -> FrameSynchronizer -> decode -> DeviceTable -> listeners
//! caller -> WriteCommand::encode -> serial port
//! ```
//!
//! The reader runs on its own thread and holds the shared lock only for
//! one byte's worth of work at a time, so queries and writes from the
//! caller's thread interleave freely.
//!
//! # Example
//!
//! ```rust,no_run
//! use twe_link::TweLink;
//!
//! let link = TweLink::connect("/dev/ttyUSB0", 115200).unwrap();
//! link.on_state(|state| println!("{}", state));
//! link.digital_write_pin(0x01, 0, true);
//! ```

pub mod error;
pub mod link;
mod reader;
pub mod scanner;
pub mod table;
pub mod transport;

pub use error::LinkError;
pub use link::{ListenerId, TweLink};
pub use scanner::{enumerate_ports, PortInfo};
pub use table::DeviceTable;
pub use transport::{SerialTransport, Transport};

pub use twe_protocol::DeviceState;
