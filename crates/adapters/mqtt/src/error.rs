//! MQTT adapter error types.

use sleepbridge_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The connection to the broker failed.
    #[error("MQTT connection error")]
    Connection(#[source] rumqttc::ConnectionError),
}

impl MqttError {
    /// Convert into a [`BridgeError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> BridgeError {
        BridgeError::Transport(Box::new(self))
    }
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_connection_errors() {
        let err = MqttError::Connection(rumqttc::ConnectionError::RequestsDone);
        assert_eq!(err.to_string(), "MQTT connection error");
    }

    #[test]
    fn should_wrap_transport_errors_as_opaque_source() {
        let err: BridgeError =
            MqttError::Connection(rumqttc::ConnectionError::RequestsDone).into();
        assert!(matches!(err, BridgeError::Transport(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
