//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! at the port boundary. No `String` variants — sources stay typed.

/// Top-level error for the sleepbridge workspace.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced object does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The host entity-management layer rejected a registration.
    #[error("entity registration failed")]
    Registration(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An adapter-level transport failure (MQTT client, connection, …).
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Device identifiers are opaque but must not be empty.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// A received topic contained no segments at all.
    #[error("topic must contain at least one segment")]
    EmptyTopic,
}

/// A lookup failed because the object does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// Kind of object that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// The identifier that missed.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_validation_errors() {
        assert_eq!(
            ValidationError::EmptyDeviceId.to_string(),
            "device id must not be empty"
        );
        assert_eq!(
            ValidationError::EmptyTopic.to_string(),
            "topic must contain at least one segment"
        );
    }

    #[test]
    fn should_convert_validation_error_into_bridge_error() {
        let err: BridgeError = ValidationError::EmptyDeviceId.into();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Device",
            id: "phone1".to_string(),
        };
        assert_eq!(err.to_string(), "Device `phone1` not found");
    }

    #[test]
    fn should_keep_source_on_registration_error() {
        let inner = std::io::Error::other("boom");
        let err = BridgeError::Registration(Box::new(inner));
        assert!(std::error::Error::source(&err).is_some());
    }
}
