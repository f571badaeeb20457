//! Notification — an immutable record broadcast on the in-process bus.
//!
//! Notifications are produced when a device is first seen, when a sensor's
//! displayed value changes, and for every recognised sleep event (the latter
//! feed the device-trigger pass-through).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::event::SleepEvent;
use crate::time::{Timestamp, now};

/// Unique identifier for a [`Notification`], backed by a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(uuid::Uuid);

impl Default for NotificationId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl NotificationId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NotificationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    /// A device's sensors were created and registered for the first time.
    DeviceDiscovered,
    /// A sensor's displayed value changed.
    StateChanged { sensor: String, value: String },
    /// A recognised sleep event arrived (fired regardless of state changes).
    EventFired { event: SleepEvent },
}

/// A timestamped record of something that happened to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub device: DeviceId,
    pub kind: NotificationKind,
    pub timestamp: Timestamp,
}

impl Notification {
    /// Build a notification stamped with the current time.
    #[must_use]
    pub fn new(device: DeviceId, kind: NotificationKind) -> Self {
        Self {
            id: NotificationId::new(),
            device,
            kind,
            timestamp: now(),
        }
    }
}
