//! Device registry — the single mutable mapping from device id to its sensor
//! set.
//!
//! Sensor sets are created lazily on the first message from a device and
//! registered with the host through the [`EntityRegistrar`] port before the
//! message proceeds. All mutation happens under one async mutex, so the
//! message-handling path and the device-removal path are mutually exclusive
//! and a device can never be created twice under concurrent first arrival.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokio::sync::Mutex;

use sleepbridge_domain::attribute::AttributeMap;
use sleepbridge_domain::device::{Device, DeviceId, strip_display_prefix};
use sleepbridge_domain::error::BridgeError;
use sleepbridge_domain::event::SleepEvent;
use sleepbridge_domain::sensor::{self, Sensor, SensorValue};
use sleepbridge_domain::time::now;

use crate::ports::EntityRegistrar;

/// One sensor's displayed value changed while dispatching an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Unique id of the sensor that changed.
    pub sensor: String,
    pub value: SensorValue,
}

/// Outcome of dispatching one event to a device's sensor set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Whether the device was seen for the first time (sensors were created
    /// and registered as part of this dispatch).
    pub created: bool,
    pub changes: Vec<StateChange>,
}

/// Registry of known devices and their sensors.
pub struct DeviceRegistry<R> {
    integration_name: String,
    registrar: R,
    devices: Mutex<HashMap<DeviceId, Vec<Sensor>>>,
}

impl<R: EntityRegistrar> DeviceRegistry<R> {
    /// Create an empty registry for the named integration instance.
    pub fn new(integration_name: impl Into<String>, registrar: R) -> Self {
        Self {
            integration_name: integration_name.into(),
            registrar,
            devices: Mutex::new(HashMap::new()),
        }
    }

    /// Name of the integration instance (used to derive and undo the host's
    /// device display names).
    #[must_use]
    pub fn integration_name(&self) -> &str {
        &self.integration_name
    }

    /// Look up or lazily create the sensor set for a device, using `factory`
    /// to build the canonical set on first sight.
    ///
    /// Returns `true` when the device was newly created. Idempotent: a second
    /// call for the same device leaves the existing set untouched and returns
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns the error of the host registration; in that case nothing is
    /// stored and the next message for this device retries the creation.
    pub async fn ensure_device_with<F>(
        &self,
        device_id: &DeviceId,
        factory: F,
    ) -> Result<bool, BridgeError>
    where
        F: FnOnce(&DeviceId) -> Vec<Sensor>,
    {
        let mut devices = self.devices.lock().await;
        let (_, created) = Self::get_or_create(
            &self.registrar,
            &mut devices,
            device_id,
            factory,
        )
        .await?;
        Ok(created)
    }

    /// Dispatch one recognised event (plus its attribute map) to every sensor
    /// of the given device, creating and registering the canonical sensor set
    /// first if the device is new.
    ///
    /// # Errors
    ///
    /// Returns the host registration error for a brand-new device; dispatch
    /// to existing sensors itself cannot fail.
    pub async fn handle_event(
        &self,
        device_id: &DeviceId,
        event: SleepEvent,
        attributes: &AttributeMap,
    ) -> Result<Dispatch, BridgeError> {
        let mut devices = self.devices.lock().await;
        let (sensors, created) = Self::get_or_create(
            &self.registrar,
            &mut devices,
            device_id,
            sensor::default_set,
        )
        .await?;

        let at = now();
        let changes = sensors
            .iter_mut()
            .filter_map(|sensor| {
                sensor.handle_event(event, attributes, at).map(|value| {
                    tracing::debug!(
                        sensor = %sensor.unique_id(),
                        %value,
                        "sensor state changed"
                    );
                    StateChange {
                        sensor: sensor.unique_id(),
                        value,
                    }
                })
            })
            .collect();

        Ok(Dispatch { created, changes })
    }

    /// Remove a device's sensors, keyed either by the raw device id or by the
    /// display name the host derived from it (`"<integration> <device>"` —
    /// the prefix is stripped before lookup).
    ///
    /// Returns the removed sensor set, or `None` if the device was unknown.
    pub async fn remove_device(&self, name: &str) -> Option<Vec<Sensor>> {
        let key = strip_display_prefix(name, &self.integration_name);
        let device_id = DeviceId::new(key).ok()?;
        let removed = self.devices.lock().await.remove(&device_id);
        match &removed {
            Some(sensors) => {
                tracing::debug!(device = %device_id, count = sensors.len(), "device removed");
            }
            None => tracing::debug!(device = %device_id, "remove requested for unknown device"),
        }
        removed
    }

    /// Snapshot of a device's sensors, if the device is known.
    pub async fn sensors(&self, device_id: &DeviceId) -> Option<Vec<Sensor>> {
        self.devices.lock().await.get(device_id).cloned()
    }

    /// Number of known devices.
    pub async fn device_count(&self) -> usize {
        self.devices.lock().await.len()
    }

    // Registration is awaited while the registry lock is held: the creating
    // message must not release the sensor set until the host has accepted it.
    async fn get_or_create<'a, F>(
        registrar: &R,
        devices: &'a mut HashMap<DeviceId, Vec<Sensor>>,
        device_id: &DeviceId,
        factory: F,
    ) -> Result<(&'a mut Vec<Sensor>, bool), BridgeError>
    where
        F: FnOnce(&DeviceId) -> Vec<Sensor>,
    {
        match devices.entry(device_id.clone()) {
            Entry::Occupied(occupied) => Ok((occupied.into_mut(), false)),
            Entry::Vacant(vacant) => {
                let sensors = factory(device_id);
                let device = Device::new(device_id.clone());
                registrar.register_device(&device, &sensors).await?;
                tracing::info!(device = %device_id, "registered new device");
                Ok((vacant.insert(sensors), true))
            }
        }
    }
}
