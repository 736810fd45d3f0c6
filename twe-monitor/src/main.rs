//! TWELite Network Monitor
//!
//! Connects to a serial coordinator and prints every sensor report as it
//! arrives. The port can be given as the first argument; without one the
//! first port that looks like a TWELite adapter is used.
//!
//! ```text
//! twe-monitor [/dev/ttyUSB0]
//! ```

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twe_link::{enumerate_ports, LinkError, TweLink};

const BAUD_RATE: u32 = 115_200;

fn pick_port() -> Result<String, LinkError> {
    if let Some(port) = std::env::args().nth(1) {
        return Ok(port);
    }

    let ports = enumerate_ports()?;
    ports
        .iter()
        .find(|p| p.looks_like_twelite())
        .or_else(|| ports.first())
        .map(|p| p.port.clone())
        .ok_or_else(|| LinkError::EnumerationFailed("no serial ports available".into()))
}

fn run() -> Result<(), Box<dyn Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })?;

    let port = pick_port()?;
    let mut link = TweLink::connect(&port, BAUD_RATE)?;

    link.on_state(|state| {
        println!("{}", state);
    });

    info!(port = %port, "monitoring; press Ctrl-C to stop");
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    info!("shutting down");
    link.disconnect();
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twe_monitor=info,twe_link=info,twe_protocol=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TWELite network monitor");

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
