//! Notification bus port — publish/subscribe for bridge notifications.

use std::future::Future;

use sleepbridge_domain::error::BridgeError;
use sleepbridge_domain::notification::Notification;

/// Publishes notifications to interested subscribers.
pub trait NotificationPublisher {
    /// Publish a notification to all current subscribers.
    fn publish(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: NotificationPublisher + Send + Sync> NotificationPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(notification)
    }
}
