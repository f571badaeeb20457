//! # sleepbridged — sleepbridge daemon
//!
//! Composition root that wires the MQTT adapter to the device registry and
//! runs the bridge.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize structured logging
//! - Construct the entity registrar and device registry
//! - Construct the in-process notification bus and its log subscriber
//! - Run the MQTT event loop until shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod registrar;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sleepbridge_adapter_mqtt::SleepBridge;
use sleepbridge_app::event_bus::InProcessEventBus;
use sleepbridge_app::registry::DeviceRegistry;
use sleepbridge_domain::notification::NotificationKind;

use crate::config::Config;
use crate::registrar::LoggingRegistrar;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let bus = Arc::new(InProcessEventBus::new(256));
    let registry = Arc::new(DeviceRegistry::new(
        config.mqtt.name.clone(),
        LoggingRegistrar::default(),
    ));

    // Log every notification that crosses the bus; in a host integration this
    // subscriber would be replaced by the trigger and state machinery.
    let mut notifications = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(notification) => match &notification.kind {
                    NotificationKind::DeviceDiscovered => {
                        info!(device = %notification.device, "device discovered");
                    }
                    NotificationKind::StateChanged { sensor, value } => {
                        info!(%sensor, %value, "state changed");
                    }
                    NotificationKind::EventFired { event } => {
                        info!(device = %notification.device, %event, "event fired");
                    }
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut bridge = SleepBridge::new(&config.mqtt, registry, Arc::clone(&bus));
    info!(
        host = %config.mqtt.broker_host,
        port = config.mqtt.broker_port,
        "starting sleepbridge"
    );

    let outcome = tokio::select! {
        result = bridge.run() => result,
        () = shutdown_signal() => {
            info!("shutdown signal received");
            Ok(())
        }
    };

    if let Err(err) = bridge.teardown().await {
        warn!(error = &err as &dyn std::error::Error, "teardown failed");
    }
    if let Err(err) = outcome {
        let err = err.into_domain();
        error!(error = &err as &dyn std::error::Error, "bridge stopped");
        return Err(err.into());
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = &err as &dyn std::error::Error, "could not listen for shutdown signal");
        // Without a signal handler the only way out is the connection failing.
        std::future::pending::<()>().await;
    }
}
