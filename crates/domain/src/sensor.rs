//! Sensor — a per-device state machine mapping sleep events to a displayed
//! value.
//!
//! Each sensor kind carries a static event→value mapping table. Processing an
//! event updates the displayed value (and reports the change) only when the
//! mapped value differs from the current one; events outside the table leave
//! the value untouched. Some kinds additionally keep the event's attribute
//! map as an auxiliary side-channel, replaced unconditionally on every
//! recognised event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeMap;
use crate::device::DeviceId;
use crate::event::SleepEvent;
use crate::time::Timestamp;

/// Displayed value of a sensor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SensorValue {
    /// Sentinel initial state; also a reachable mapped value.
    #[default]
    Unknown,
    Value(String),
}

impl SensorValue {
    /// Shortcut for building a concrete value.
    #[must_use]
    pub fn value(s: impl Into<String>) -> Self {
        Self::Value(s.into())
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Value(v) => f.write_str(v),
        }
    }
}

/// The mapping strategy of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Tracks the most recent recognised event; identity mapping over the
    /// whole enumeration. Also stores the full attribute map.
    LastEvent,
    /// Awake/asleep state derived from the wakefulness events.
    IsAsleep,
}

impl SensorKind {
    /// Sensor name, used as the suffix of the unique id.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LastEvent => "last_event",
            Self::IsAsleep => "is_asleep",
        }
    }

    /// Icon hint forwarded to the host frontend.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::LastEvent => "mdi:arrow-right-thick",
            Self::IsAsleep => "mdi:sleep",
        }
    }

    /// Whether this kind stores the event's attribute map as a side-channel.
    #[must_use]
    pub fn keeps_attributes(self) -> bool {
        matches!(self, Self::LastEvent)
    }

    /// The static mapping table. `None` means the event is not in the table
    /// and leaves the sensor's value unchanged.
    #[must_use]
    pub fn map_event(self, event: SleepEvent) -> Option<SensorValue> {
        match self {
            Self::LastEvent => Some(SensorValue::value(event.as_str())),
            Self::IsAsleep => match event {
                SleepEvent::Awake => Some(SensorValue::value("awake")),
                SleepEvent::NotAwake => Some(SensorValue::value("sleeping")),
                SleepEvent::SleepTrackingStopped | SleepEvent::SleepTrackingPaused => {
                    Some(SensorValue::Unknown)
                }
                _ => None,
            },
        }
    }
}

/// A stateful sensor instance owned by the device registry.
#[derive(Debug, Clone)]
pub struct Sensor {
    device: DeviceId,
    kind: SensorKind,
    value: SensorValue,
    attributes: AttributeMap,
    last_changed: Option<Timestamp>,
}

impl Sensor {
    /// Create a sensor in the `unknown` initial state.
    #[must_use]
    pub fn new(device: DeviceId, kind: SensorKind) -> Self {
        Self {
            device,
            kind,
            value: SensorValue::default(),
            attributes: AttributeMap::default(),
            last_changed: None,
        }
    }

    /// Unique id of the form `<deviceId>_<sensorName>`.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.device, self.kind.name())
    }

    #[must_use]
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &SensorValue {
        &self.value
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    #[must_use]
    pub fn last_changed(&self) -> Option<Timestamp> {
        self.last_changed
    }

    /// Feed one recognised event (plus its attribute map) through the state
    /// machine.
    ///
    /// Returns the new displayed value when it actually changed, `None`
    /// otherwise. Attribute side-channel updates apply regardless of whether
    /// the value changed.
    pub fn handle_event(
        &mut self,
        event: SleepEvent,
        attributes: &AttributeMap,
        at: Timestamp,
    ) -> Option<SensorValue> {
        if self.kind.keeps_attributes() {
            self.attributes = attributes.clone();
        }
        let mapped = self.kind.map_event(event)?;
        if mapped == self.value {
            return None;
        }
        self.value = mapped.clone();
        self.last_changed = Some(at);
        Some(mapped)
    }
}

/// The canonical sensor set created for a newly seen device.
#[must_use]
pub fn default_set(device: &DeviceId) -> Vec<Sensor> {
    vec![
        Sensor::new(device.clone(), SensorKind::LastEvent),
        Sensor::new(device.clone(), SensorKind::IsAsleep),
    ]
}
