//! Device triggers — the static pass-through from sleep events to the host's
//! automation platform.
//!
//! There is no rule engine here: one trigger definition exists per enumerated
//! event (plus the `unknown` sentinel), and firing is a plain filter on the
//! notification stream by device id and event name.

use serde::{Deserialize, Serialize};

use crate::DOMAIN;
use crate::device::DeviceId;
use crate::event::SleepEvent;
use crate::notification::{Notification, NotificationKind};

/// Trigger type offered for events outside the closed enumeration.
pub const UNKNOWN_TRIGGER: &str = "unknown";

/// One trigger definition as consumed by the host's automation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTrigger {
    /// Always `"device"`.
    pub platform: String,
    /// Always [`DOMAIN`].
    pub domain: String,
    pub device_id: DeviceId,
    /// The event name this trigger fires on.
    #[serde(rename = "type")]
    pub trigger_type: String,
}

impl DeviceTrigger {
    /// Build the trigger for one event name on one device.
    #[must_use]
    pub fn new(device_id: DeviceId, trigger_type: impl Into<String>) -> Self {
        Self {
            platform: "device".to_string(),
            domain: DOMAIN.to_string(),
            device_id,
            trigger_type: trigger_type.into(),
        }
    }

    /// Whether a bus notification fires this trigger: it must be an
    /// [`NotificationKind::EventFired`] for the same device with a matching
    /// event name.
    #[must_use]
    pub fn matches(&self, notification: &Notification) -> bool {
        if notification.device != self.device_id {
            return false;
        }
        match &notification.kind {
            NotificationKind::EventFired { event } => event.as_str() == self.trigger_type,
            _ => false,
        }
    }
}

/// All trigger definitions available for one device: one per enumerated event
/// plus the `unknown` sentinel.
#[must_use]
pub fn triggers_for_device(device_id: &DeviceId) -> Vec<DeviceTrigger> {
    SleepEvent::ALL
        .iter()
        .map(|event| DeviceTrigger::new(device_id.clone(), event.as_str()))
        .chain(std::iter::once(DeviceTrigger::new(
            device_id.clone(),
            UNKNOWN_TRIGGER,
        )))
        .collect()
}
