//! Port definitions — traits implemented outside the application core.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the use-case layer
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod entity_registry;
pub mod event_bus;

pub use entity_registry::EntityRegistrar;
pub use event_bus::NotificationPublisher;
