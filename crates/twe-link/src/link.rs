//! Connection handle and host-facing API
//!
//! [`TweLink`] owns the serial port, the background reader thread and the
//! device table. All shared state sits behind one mutex that the reader
//! holds for a single byte's worth of work at a time, so table queries
//! and outbound writes from the caller's thread interleave with reads.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use twe_protocol::{DeviceState, FrameSynchronizer, WriteCommand, BROADCAST_ID, CHANNELS};

use crate::error::LinkError;
use crate::reader;
use crate::table::DeviceTable;
use crate::transport::{SerialTransport, Transport};

/// Handle returned by [`TweLink::on_state`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(DeviceState) + Send>;

/// State the reader thread mutates under the lock
pub(crate) struct Inner {
    pub(crate) transport: Option<Box<dyn Transport>>,
    pub(crate) sync: FrameSynchronizer,
    pub(crate) table: DeviceTable,
}

pub(crate) struct Shared {
    pub(crate) inner: Mutex<Inner>,
    pub(crate) listeners: Mutex<Vec<(ListenerId, Listener)>>,
    pub(crate) running: AtomicBool,
    next_listener: AtomicU64,
}

/// Lock a mutex, recovering the data if a panicking listener poisoned it
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Connection to a TWELite network through its serial coordinator
pub struct TweLink {
    shared: Arc<Shared>,
    reader: Option<JoinHandle<()>>,
}

impl TweLink {
    /// Open the serial port and start the background reader
    pub fn connect(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let transport = SerialTransport::open(path, baud_rate)?;
        info!(port = path, baud_rate, "connected to coordinator");
        Ok(Self::with_transport(Box::new(transport)))
    }

    /// Build a link over an already-open transport
    ///
    /// This is how tests drive the reader with scripted bytes; production
    /// code goes through [`connect`](Self::connect).
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                transport: Some(transport),
                sync: FrameSynchronizer::new(),
                table: DeviceTable::new(),
            }),
            listeners: Mutex::new(Vec::new()),
            running: AtomicBool::new(true),
            next_listener: AtomicU64::new(0),
        });

        let reader_shared = Arc::clone(&shared);
        let reader = std::thread::spawn(move || reader::run(reader_shared));

        Self {
            shared,
            reader: Some(reader),
        }
    }

    /// Stop the reader and release the serial port
    ///
    /// Idempotent; also invoked on drop.
    pub fn disconnect(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.reader.take() {
            if handle.join().is_err() {
                warn!("reader thread panicked");
            }
        }
        let mut inner = lock(&self.shared.inner);
        inner.transport = None;
        inner.sync.clear();
    }

    /// True while the port is open and the reader is live
    pub fn is_connected(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst) && lock(&self.shared.inner).transport.is_some()
    }

    // ---- outbound commands --------------------------------------------

    fn write_command(&self, command: WriteCommand) {
        let frame = command.encode();
        let mut inner = lock(&self.shared.inner);
        match inner.transport.as_mut() {
            Some(transport) => {
                if let Err(e) = transport.write_all(&frame) {
                    warn!("serial write failed: {}", e);
                }
            }
            None => debug!("write dropped, not connected"),
        }
    }

    /// Drive all four analog outputs of one node; 0xFFFF skips a channel
    pub fn analog_write(&self, device_id: u8, values: [u16; CHANNELS]) {
        self.write_command(WriteCommand::Analog { device_id, values });
    }

    /// Drive one analog output of one node
    pub fn analog_write_pin(&self, device_id: u8, pin: usize, value: u16) {
        match WriteCommand::analog_pin(device_id, pin, value) {
            Some(cmd) => self.write_command(cmd),
            None => debug!(pin, "analog write to out-of-range pin ignored"),
        }
    }

    /// Broadcast analog values to every node
    pub fn analog_write_all(&self, values: [u16; CHANNELS]) {
        self.write_command(WriteCommand::analog_broadcast(values));
    }

    /// Broadcast one analog channel to every node
    pub fn analog_write_all_pin(&self, pin: usize, value: u16) {
        match WriteCommand::analog_pin(BROADCAST_ID, pin, value) {
            Some(cmd) => self.write_command(cmd),
            None => debug!(pin, "analog write to out-of-range pin ignored"),
        }
    }

    /// Drive digital outputs of one node; only masked channels change
    pub fn digital_write(&self, device_id: u8, levels: [bool; CHANNELS], mask: [bool; CHANNELS]) {
        self.write_command(WriteCommand::Digital {
            device_id,
            levels,
            mask,
        });
    }

    /// Drive one digital output of one node
    pub fn digital_write_pin(&self, device_id: u8, pin: usize, level: bool) {
        match WriteCommand::digital_pin(device_id, pin, level) {
            Some(cmd) => self.write_command(cmd),
            None => debug!(pin, "digital write to out-of-range pin ignored"),
        }
    }

    /// Broadcast all four digital levels to every node
    pub fn digital_write_all(&self, levels: [bool; CHANNELS]) {
        self.write_command(WriteCommand::digital_broadcast(levels));
    }

    /// Broadcast one digital channel to every node
    pub fn digital_write_all_pin(&self, pin: usize, level: bool) {
        match WriteCommand::digital_pin(BROADCAST_ID, pin, level) {
            Some(cmd) => self.write_command(cmd),
            None => debug!(pin, "digital write to out-of-range pin ignored"),
        }
    }

    // ---- table queries ------------------------------------------------

    /// Snapshot of a device's latest report, if one has arrived
    pub fn get_state(&self, device_id: u8) -> Option<DeviceState> {
        lock(&self.shared.inner).table.get(device_id)
    }

    /// Latest analog reading in millivolts for one channel
    pub fn analog_read(&self, device_id: u8, channel: usize) -> Option<i32> {
        lock(&self.shared.inner).table.analog(device_id, channel)
    }

    /// Latest digital input level for one channel
    pub fn digital_read(&self, device_id: u8, channel: usize) -> Option<bool> {
        lock(&self.shared.inner).table.digital(device_id, channel)
    }

    /// Identifiers of every device heard from so far
    pub fn device_ids(&self) -> Vec<u8> {
        lock(&self.shared.inner).table.device_ids()
    }

    // ---- notifications ------------------------------------------------

    /// Register a callback invoked after every valid report frame
    ///
    /// Callbacks run on the reader thread in registration order, after
    /// the table update, so queries from inside a callback see the new
    /// state. Keep them short; the port is not read while they run.
    pub fn on_state<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(DeviceState) + Send + 'static,
    {
        let id = ListenerId(self.shared.next_listener.fetch_add(1, Ordering::Relaxed));
        lock(&self.shared.listeners).push((id, Box::new(callback)));
        id
    }

    /// Unregister a callback; returns false if the id is unknown
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.shared.listeners);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }
}

impl Drop for TweLink {
    fn drop(&mut self) {
        self.disconnect();
    }
}
