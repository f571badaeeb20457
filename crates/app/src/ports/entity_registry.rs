//! Entity registry port — the host's entity-management collaborator.
//!
//! Registering entities with the host is itself an asynchronous operation
//! owned by the host. The device registry awaits it before releasing the
//! newly created sensor set, so subsequent messages for the same device see
//! the sensors as already registered.

use std::future::Future;

use sleepbridge_domain::device::Device;
use sleepbridge_domain::error::BridgeError;
use sleepbridge_domain::sensor::Sensor;

/// Registers newly discovered devices and their sensors with the host.
pub trait EntityRegistrar {
    /// Register a device record and its sensor entities, exactly once per
    /// device.
    fn register_device(
        &self,
        device: &Device,
        sensors: &[Sensor],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: EntityRegistrar + Send + Sync> EntityRegistrar for std::sync::Arc<T> {
    fn register_device(
        &self,
        device: &Device,
        sensors: &[Sensor],
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).register_device(device, sensors)
    }
}
