//! # sleepbridge-adapter-mqtt
//!
//! MQTT adapter — bridges the Sleep as Android MQTT stream into sleepbridge.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and subscribe to the wildcard topic derived
//!   from the configured template
//! - Resolve the device identifier from each received topic
//! - Parse event payloads and feed them through the device registry
//! - Broadcast discovery, state-change, and event notifications on the bus
//!
//! ## Dependency rule
//! Same as other adapters: depends on `sleepbridge-app` and
//! `sleepbridge-domain`.

pub mod config;
pub mod error;
pub mod payload;
pub mod topic;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubAck, SubscribeReasonCode};
use tracing::{debug, error, info, trace, warn};

use sleepbridge_app::ports::{EntityRegistrar, NotificationPublisher};
use sleepbridge_app::registry::DeviceRegistry;
use sleepbridge_domain::notification::{Notification, NotificationKind};
use sleepbridge_domain::sensor;

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::payload::ParsedPayload;
use crate::topic::TopicFilter;

/// The transport-free message path: topic resolution, payload parsing,
/// registry dispatch, and notification fan-out.
///
/// Every failure is local to a single message — logged and dropped, never
/// propagated. This is what makes one malformed publish harmless to the next
/// one.
pub struct MessagePipeline<R, P> {
    filter: TopicFilter,
    registry: Arc<DeviceRegistry<R>>,
    publisher: P,
}

impl<R, P> MessagePipeline<R, P>
where
    R: EntityRegistrar + Send + Sync,
    P: NotificationPublisher + Send + Sync,
{
    /// Assemble the pipeline from its collaborators.
    pub fn new(filter: TopicFilter, registry: Arc<DeviceRegistry<R>>, publisher: P) -> Self {
        Self {
            filter,
            registry,
            publisher,
        }
    }

    /// The compiled topic filter.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    /// Handle one inbound message end to end.
    ///
    /// Any message on a resolvable topic makes the device exist before the
    /// payload is even looked at — the app's test button sends a non-event
    /// payload, and pressing it is how users surface a new device.
    pub async fn dispatch(&self, topic: &str, body: &[u8]) {
        let device = match self.filter.device_from_topic(topic) {
            Ok(device) => device,
            Err(err) => {
                warn!(
                    topic,
                    error = &err as &dyn std::error::Error,
                    "could not resolve a device from topic"
                );
                return;
            }
        };

        let created = match self
            .registry
            .ensure_device_with(&device, sensor::default_set)
            .await
        {
            Ok(created) => created,
            Err(err) => {
                error!(
                    device = %device,
                    error = &err as &dyn std::error::Error,
                    "could not register device"
                );
                return;
            }
        };
        if created {
            self.publish(Notification::new(
                device.clone(),
                NotificationKind::DeviceDiscovered,
            ))
            .await;
        }

        let parsed = match payload::parse(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    device = %device,
                    error = &err as &dyn std::error::Error,
                    "dropping malformed payload"
                );
                return;
            }
        };

        let (event, attributes) = match parsed {
            ParsedPayload::Test => {
                info!(device = %device, "received test message");
                return;
            }
            ParsedPayload::Event { event, attributes } => (event, attributes),
        };

        let dispatch = match self.registry.handle_event(&device, event, &attributes).await {
            Ok(dispatch) => dispatch,
            Err(err) => {
                error!(
                    device = %device,
                    error = &err as &dyn std::error::Error,
                    "could not dispatch event to device sensors"
                );
                return;
            }
        };

        self.publish(Notification::new(
            device.clone(),
            NotificationKind::EventFired { event },
        ))
        .await;
        for change in dispatch.changes {
            self.publish(Notification::new(
                device.clone(),
                NotificationKind::StateChanged {
                    sensor: change.sensor,
                    value: change.value.to_string(),
                },
            ))
            .await;
        }
    }

    async fn publish(&self, notification: Notification) {
        if let Err(err) = self.publisher.publish(notification).await {
            warn!(
                error = &err as &dyn std::error::Error,
                "could not publish notification"
            );
        }
    }
}

/// The MQTT-facing side: owns the client and event loop, subscribes the
/// wildcard topic, and feeds publishes through the [`MessagePipeline`].
pub struct SleepBridge<R, P> {
    pipeline: MessagePipeline<R, P>,
    client: AsyncClient,
    event_loop: EventLoop,
    qos: QoS,
}

impl<R, P> SleepBridge<R, P>
where
    R: EntityRegistrar + Send + Sync,
    P: NotificationPublisher + Send + Sync,
{
    /// Build the bridge from its configuration and collaborators. Does not
    /// connect yet; the connection is driven by [`run`](Self::run).
    #[must_use]
    pub fn new(config: &MqttConfig, registry: Arc<DeviceRegistry<R>>, publisher: P) -> Self {
        let filter = TopicFilter::new(&config.topic_template);
        debug!(
            template = %filter.template(),
            subscription = %filter.subscribe_topic(),
            "compiled topic filter"
        );

        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        let (client, event_loop) = AsyncClient::new(options, 64);

        Self {
            pipeline: MessagePipeline::new(filter, registry, publisher),
            client,
            event_loop,
            qos: config.qos(),
        }
    }

    /// Drive the MQTT event loop until the connection fails.
    ///
    /// Subscribes on every (re)connection acknowledgement. A rejected
    /// subscription is logged at error severity and leaves the bridge
    /// loaded — it simply receives no events until reconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Connection`] when the broker connection is lost.
    pub async fn run(&mut self) -> Result<(), MqttError> {
        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    let topic = self.pipeline.filter().subscribe_topic().to_string();
                    info!(%topic, "connected to broker, subscribing");
                    if let Err(err) = self.client.subscribe(topic, self.qos).await {
                        error!(
                            error = &err as &dyn std::error::Error,
                            "could not subscribe to the root topic; no events will arrive"
                        );
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    if suback_rejected(&ack) {
                        error!(
                            codes = ?ack.return_codes,
                            "broker rejected the subscription; no events will arrive"
                        );
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    debug!(topic = %publish.topic, len = publish.payload.len(), "received message");
                    self.pipeline
                        .dispatch(&publish.topic, &publish.payload)
                        .await;
                }
                Ok(event) => trace!(?event, "unhandled mqtt event"),
                Err(err) => return Err(MqttError::Connection(err)),
            }
        }
    }

    /// Release the subscription and disconnect from the broker.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] when the client rejects the request.
    pub async fn teardown(&self) -> Result<(), MqttError> {
        let topic = self.pipeline.filter().subscribe_topic().to_string();
        self.client
            .unsubscribe(topic)
            .await
            .map_err(MqttError::Client)?;
        self.client.disconnect().await.map_err(MqttError::Client)
    }
}

// The broker acknowledges a subscription per-filter; a failure code means the
// subscription silently yields nothing.
fn suback_rejected(ack: &SubAck) -> bool {
    ack.return_codes
        .iter()
        .any(|code| matches!(code, SubscribeReasonCode::Failure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;

    use sleepbridge_app::event_bus::InProcessEventBus;
    use sleepbridge_domain::device::Device;
    use sleepbridge_domain::error::BridgeError;
    use sleepbridge_domain::sensor::Sensor;

    struct AcceptingRegistrar;

    impl EntityRegistrar for AcceptingRegistrar {
        fn register_device(
            &self,
            _device: &Device,
            _sensors: &[Sensor],
        ) -> impl Future<Output = Result<(), BridgeError>> + Send {
            async { Ok(()) }
        }
    }

    fn pipeline() -> (
        MessagePipeline<AcceptingRegistrar, Arc<InProcessEventBus>>,
        Arc<InProcessEventBus>,
        Arc<DeviceRegistry<AcceptingRegistrar>>,
    ) {
        let bus = Arc::new(InProcessEventBus::new(64));
        let registry = Arc::new(DeviceRegistry::new("SleepAsAndroid", AcceptingRegistrar));
        let pipeline = MessagePipeline::new(
            TopicFilter::new("SleepAsAndroid/%%%device%%%"),
            Arc::clone(&registry),
            Arc::clone(&bus),
        );
        (pipeline, bus, registry)
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            out.push(n);
        }
        out
    }

    #[tokio::test]
    async fn should_discover_device_and_fire_notifications_for_first_event() {
        let (pipeline, bus, _) = pipeline();
        let mut rx = bus.subscribe();

        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"rem"}"#)
            .await;

        let notifications = drain(&mut rx);
        assert!(
            notifications
                .iter()
                .any(|n| n.kind == NotificationKind::DeviceDiscovered)
        );
        assert!(notifications.iter().any(|n| matches!(
            &n.kind,
            NotificationKind::StateChanged { sensor, value }
                if sensor == "phoneA_last_event" && value == "rem"
        )));
        assert!(notifications.iter().all(|n| n.device.as_str() == "phoneA"));
    }

    #[tokio::test]
    async fn should_not_rediscover_known_device() {
        let (pipeline, bus, _) = pipeline();
        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"rem"}"#)
            .await;

        let mut rx = bus.subscribe();
        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"awake"}"#)
            .await;

        let notifications = drain(&mut rx);
        assert!(
            !notifications
                .iter()
                .any(|n| n.kind == NotificationKind::DeviceDiscovered)
        );
    }

    #[tokio::test]
    async fn should_fire_event_notification_even_without_state_change() {
        let (pipeline, bus, _) = pipeline();
        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"rem"}"#)
            .await;

        let mut rx = bus.subscribe();
        // Same event again: no sensor changes, but the trigger event fires.
        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"rem"}"#)
            .await;

        let notifications = drain(&mut rx);
        assert_eq!(notifications.len(), 1);
        assert!(matches!(
            notifications[0].kind,
            NotificationKind::EventFired { .. }
        ));
    }

    #[tokio::test]
    async fn should_create_device_but_emit_no_event_for_malformed_payload() {
        let (pipeline, bus, registry) = pipeline();
        let mut rx = bus.subscribe();

        pipeline.dispatch("SleepAsAndroid/phoneA", b"not json").await;
        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"foo":"bar"}"#)
            .await;
        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"sleepwalking"}"#)
            .await;

        assert_eq!(registry.device_count().await, 1);
        let notifications = drain(&mut rx);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::DeviceDiscovered);
    }

    #[tokio::test]
    async fn should_create_device_when_test_signal_arrives() {
        let (pipeline, bus, registry) = pipeline();
        let mut rx = bus.subscribe();

        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"Unknown"}"#)
            .await;

        // The device appears, but no event fires and no sensor changes.
        assert_eq!(registry.device_count().await, 1);
        let notifications = drain(&mut rx);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::DeviceDiscovered);
    }

    #[tokio::test]
    async fn should_keep_devices_independent() {
        let (pipeline, bus, _) = pipeline();
        let mut rx = bus.subscribe();

        pipeline
            .dispatch("SleepAsAndroid/phoneA", br#"{"event":"awake"}"#)
            .await;
        pipeline
            .dispatch("SleepAsAndroid/phoneB", br#"{"event":"not_awake"}"#)
            .await;

        let notifications = drain(&mut rx);
        let discovered: Vec<&str> = notifications
            .iter()
            .filter(|n| n.kind == NotificationKind::DeviceDiscovered)
            .map(|n| n.device.as_str())
            .collect();
        assert_eq!(discovered, vec!["phoneA", "phoneB"]);
    }

    #[test]
    fn should_detect_broker_rejected_subscription() {
        let rejected = SubAck::new(1, vec![SubscribeReasonCode::Failure]);
        assert!(suback_rejected(&rejected));

        let granted = SubAck::new(1, vec![SubscribeReasonCode::Success(QoS::AtMostOnce)]);
        assert!(!suback_rejected(&granted));
    }
}
