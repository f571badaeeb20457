//! # sleepbridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that the outside world implements:
//!   - `EntityRegistrar` — the host's entity-management collaborator
//!   - `NotificationPublisher` — sink for state-change/event notifications
//! - Provide **in-process infrastructure** (notification bus) that doesn't
//!   need IO
//! - Own the **device registry**: the single mutable mapping from device id
//!   to its sensor set, including lazy creation and removal
//!
//! ## Dependency rule
//! Depends on `sleepbridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod event_bus;
pub mod ports;
pub mod registry;
