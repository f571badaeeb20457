//! Standalone entity registrar.
//!
//! When the daemon runs outside a larger home-automation host there is no
//! entity platform to hand sensors to; this registrar accepts every device
//! and records it in the log so operators can see discovery happen.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use sleepbridge_app::ports::EntityRegistrar;
use sleepbridge_domain::device::Device;
use sleepbridge_domain::error::BridgeError;
use sleepbridge_domain::sensor::Sensor;

/// Registrar that logs each registration and keeps a running count.
#[derive(Debug, Default)]
pub struct LoggingRegistrar {
    registered: AtomicUsize,
}

impl LoggingRegistrar {
    /// Number of devices registered so far.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registered.load(Ordering::Relaxed)
    }
}

impl EntityRegistrar for LoggingRegistrar {
    fn register_device(
        &self,
        device: &Device,
        sensors: &[Sensor],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let total = self.registered.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            device = %device.id,
            sensors = sensors.len(),
            total,
            "device registered"
        );
        async { Ok(()) }
    }
}
