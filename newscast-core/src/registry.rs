use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ConsumerId;

#[derive(Debug, Default)]
struct RegistryState {
    subscribers: HashSet<ConsumerId>,
    // consumer -> link of the most recently pushed item
    last_seen: HashMap<ConsumerId, String>,
}

/// Push-notification subscribers plus their per-consumer dedup markers.
///
/// Membership operations are idempotent. Markers are written only through
/// [`mark_and_check`](Self::mark_and_check), which the dispatcher calls at
/// most once per consumer per cycle; they survive an unsubscribe so a
/// returning consumer is not re-sent an item they already received.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the consumer was not already subscribed.
    pub async fn subscribe(&self, consumer: ConsumerId) -> bool {
        self.inner.write().await.subscribers.insert(consumer)
    }

    /// Returns true when the consumer was subscribed.
    pub async fn unsubscribe(&self, consumer: ConsumerId) -> bool {
        self.inner.write().await.subscribers.remove(&consumer)
    }

    pub async fn is_subscribed(&self, consumer: ConsumerId) -> bool {
        self.inner.read().await.subscribers.contains(&consumer)
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.subscribers.is_empty()
    }

    /// Cloned membership for mutation-safe iteration.
    pub async fn snapshot(&self) -> Vec<ConsumerId> {
        self.inner.read().await.subscribers.iter().copied().collect()
    }

    /// The dedup gate: true (and marker updated) iff `link` differs from the
    /// consumer's stored marker.
    pub async fn mark_and_check(&self, consumer: ConsumerId, link: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.last_seen.get(&consumer) {
            Some(seen) if seen == link => false,
            _ => {
                inner.last_seen.insert(consumer, link.to_owned());
                true
            }
        }
    }
}
