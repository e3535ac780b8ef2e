//! In-process toast bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ToastBus`] fans every [`Toast`] out to any number of presenters. It is
//! designed to be shared via `Arc<ToastBus>` and handed to the alert engine as
//! its [`NotificationSink`].

use tokio::sync::broadcast;

use crate::notification::{NotificationSink, Toast};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out toast bus.
///
/// # Usage
///
/// ```rust
/// use margin_events::{NotificationSink, Toast, ToastBus};
///
/// let bus = ToastBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.notify(Toast::invalid_data(2));
/// ```
pub struct ToastBus {
    sender: broadcast::Sender<Toast>,
}

impl ToastBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed toasts are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all toasts published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    /// Number of presenters currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationSink for ToastBus {
    /// Publish a toast to all current subscribers.
    ///
    /// If nobody is subscribed the toast is dropped.
    fn notify(&self, toast: Toast) {
        if self.sender.send(toast).is_err() {
            tracing::debug!("No toast subscribers, notification dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::ToastVariant;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = ToastBus::default();
        let mut rx = bus.subscribe();

        bus.notify(Toast::invalid_data(4));

        let received = rx.recv().await.expect("should receive the toast");
        assert_eq!(received.variant, ToastVariant::Default);
        assert!(received.description.starts_with("4 productos"));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_toast() {
        let bus = ToastBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.notify(Toast::invalid_data(1));

        let t1 = rx1.recv().await.expect("subscriber 1 should receive");
        let t2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(t1, t2);
    }

    #[test]
    fn notify_with_no_subscribers_does_not_panic() {
        let bus = ToastBus::default();
        bus.notify(Toast::invalid_data(1));
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = ToastBus::new(2);
        let mut rx = bus.subscribe();
        for n in 1..=3 {
            bus.notify(Toast::invalid_data(n));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }
}
