//! # sleepbridge-domain
//!
//! Pure domain model for the sleepbridge MQTT integration.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, error conventions, timestamps
//! - Define **SleepEvents** (the closed set of discriminators published by
//!   the Sleep as Android application)
//! - Define **Sensors** (per-device state machines mapping events to a
//!   displayed value)
//! - Define **Notifications** (state-change and event records broadcast on
//!   the in-process bus)
//! - Define **Device triggers** (static enumeration-to-metadata pass-through
//!   for automation platforms)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod attribute;
pub mod device;
pub mod event;
pub mod notification;
pub mod sensor;
pub mod trigger;

/// Integration domain identifier, used in trigger definitions and as the
/// namespace for device identity.
pub const DOMAIN: &str = "sleep_as_android";
