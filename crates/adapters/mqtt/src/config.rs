//! MQTT integration configuration.

use serde::Deserialize;

use crate::topic::DEVICE_PLACEHOLDER;

/// Configuration for the MQTT integration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Quality-of-service level for the root subscription (0, 1 or 2).
    pub qos: u8,
    /// Display name of the integration instance.
    pub name: String,
    /// Topic template; the device placeholder marks where the device
    /// identifier appears.
    pub topic_template: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "sleepbridge".to_string(),
            keep_alive_secs: 30,
            qos: 0,
            name: "SleepAsAndroid".to_string(),
            topic_template: format!("SleepAsAndroid/{DEVICE_PLACEHOLDER}"),
        }
    }
}

impl MqttConfig {
    /// The configured QoS as the client's type. Levels above 2 fall back to
    /// at-most-once.
    #[must_use]
    pub fn qos(&self) -> rumqttc::QoS {
        match self.qos {
            1 => rumqttc::QoS::AtLeastOnce,
            2 => rumqttc::QoS::ExactlyOnce,
            _ => rumqttc::QoS::AtMostOnce,
        }
    }
}
