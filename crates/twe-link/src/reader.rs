//! Background reader loop
//!
//! Pulls bytes off the transport one at a time, feeds the synchronizer,
//! decodes delimited frames and applies reports to the device table.
//! Malformed frames are logged and dropped; nothing on this path stops
//! the loop except a shutdown request or a vanished transport.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use twe_protocol::{decode_frame, DeviceState, FrameError, InboundFrame};

use crate::link::{lock, Inner, Shared};

/// Idle back-off when the port has nothing buffered
const POLL_INTERVAL: Duration = Duration::from_millis(1);

pub(crate) fn run(shared: Arc<Shared>) {
    debug!("reader thread started");

    while shared.running.load(Ordering::SeqCst) {
        let mut report: Option<DeviceState> = None;
        let mut idle = false;

        {
            let mut inner = lock(&shared.inner);
            let Inner {
                transport,
                sync,
                table,
            } = &mut *inner;

            let Some(transport) = transport.as_mut() else {
                break;
            };

            if transport.byte_available() {
                if let Some(byte) = transport.read_byte() {
                    if let Some(payload) = sync.push_byte(byte) {
                        match decode_frame(&payload) {
                            Ok(InboundFrame::Report(state)) => {
                                table.apply(state);
                                report = Some(state);
                            }
                            Ok(InboundFrame::Other { command_code, .. }) => {
                                trace!(command_code, "non-report frame ignored");
                            }
                            Err(FrameError::ChecksumMismatch { sum, raw }) => {
                                warn!(sum, raw = %raw, "dropping frame with bad checksum");
                            }
                            Err(FrameError::TooShort { len }) => {
                                debug!(len, "dropping short frame");
                            }
                        }
                    }
                }
            } else {
                idle = true;
            }
        }

        // Dispatch outside the state lock so callbacks can query the table
        if let Some(state) = report {
            let listeners = lock(&shared.listeners);
            for (_, listener) in listeners.iter() {
                listener(state);
            }
        }

        if idle {
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    debug!("reader thread stopped");
}
