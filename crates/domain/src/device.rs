//! Device — a phone running the sleep-tracking application.
//!
//! Devices are keyed by an identifier extracted from the MQTT topic. The
//! identifier is opaque and case-sensitive; two topics that differ only in
//! case name two different devices.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Stable, opaque identifier for a device, taken verbatim from a topic
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a raw topic segment as a device identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceId`] when the segment is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(Self(raw))
    }

    /// Access the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A device record exposed to the host's device registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Human-readable name; defaults to the raw identifier.
    pub name: String,
}

impl Device {
    /// Build a device record from its identifier.
    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        let name = id.as_str().to_string();
        Self { id, name }
    }

    /// Display name as derived by the host: integration name, a space, then
    /// the device name. [`strip_display_prefix`] reverses this.
    #[must_use]
    pub fn display_name(&self, integration: &str) -> String {
        format!("{integration} {}", self.name)
    }
}

/// Undo the host's `"<integration> <device>"` naming so a display name can be
/// used as a registry key again. Names without the prefix pass through
/// unchanged.
#[must_use]
pub fn strip_display_prefix<'a>(name: &'a str, integration: &str) -> &'a str {
    match name.strip_prefix(integration) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(name),
        None => name,
    }
}
