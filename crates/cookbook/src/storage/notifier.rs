//! Commit notification fan-out shared by the storage backends.
//!
//! Wraps a tokio broadcast channel. Backends publish after every commit;
//! the observation bridge subscribes.

use tokio::sync::broadcast;

use cookbook_core::storage::StoreChange;

/// Channel capacity for change notifications.
///
/// A subscriber that falls further behind gets `Lagged` and re-evaluates
/// its query from scratch, so this only bounds memory.
const CHANNEL_CAPACITY: usize = 256;

/// Broadcasts committed store changes to any number of subscribers.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeNotifier {
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes a change. Having no subscribers is not an error.
    pub fn publish(&self, change: StoreChange) {
        let receivers = self.sender.send(change).unwrap_or(0);
        tracing::trace!(receivers, "Published store change");
    }

    /// Subscribes to changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_and_subscribe() {
        let notifier = ChangeNotifier::new();
        let mut receiver = notifier.subscribe();

        notifier.publish(StoreChange::recipe_upserted("r1"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received, StoreChange::recipe_upserted("r1"));
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_same_order() {
        let notifier = ChangeNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.publish(StoreChange::recipe_upserted("r1"));
        notifier.publish(StoreChange::recipe_deleted("r1"));

        for receiver in [&mut first, &mut second] {
            assert_eq!(
                receiver.recv().await.unwrap(),
                StoreChange::recipe_upserted("r1")
            );
            assert_eq!(
                receiver.recv().await.unwrap(),
                StoreChange::recipe_deleted("r1")
            );
        }
    }

    #[test]
    fn test_publish_no_subscribers() {
        let notifier = ChangeNotifier::new();
        notifier.publish(StoreChange::user_upserted("alice"));
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_changes() {
        let notifier = ChangeNotifier::new();
        notifier.publish(StoreChange::recipe_upserted("r1"));

        let mut receiver = notifier.subscribe();
        notifier.publish(StoreChange::recipe_upserted("r2"));

        assert_eq!(
            receiver.recv().await.unwrap(),
            StoreChange::recipe_upserted("r2")
        );
    }
}
