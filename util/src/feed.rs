//! A thread-safe, topic-keyed broadcast feed.
//!
//! Uses one Tokio broadcast channel per topic, created lazily on first
//! subscription. Delivery is best-effort: a subscriber that falls behind gets
//! `RecvError::Lagged` and must reconcile against durable storage, which stays
//! the source of truth.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Per-topic buffer size used by [`FeedManager::new`].
pub const DEFAULT_CAPACITY: usize = 100;

/// Manages broadcast channels per topic.
///
/// - Lazily creates a channel per topic on first subscription
/// - Publishing to a topic nobody subscribed to is a no-op
/// - Removes topics whose subscriber count has dropped to zero after a publish
///   or when a subscriber is released
pub struct FeedManager<K, T> {
    inner: Arc<RwLock<HashMap<K, broadcast::Sender<T>>>>,
    capacity: usize,
}

impl<K, T> Clone for FeedManager<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
        }
    }
}

impl<K, T> Default for FeedManager<K, T>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    T: Clone,
{
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<K, T> FeedManager<K, T>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager whose topics buffer up to `capacity` messages per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Subscribes to `topic`, creating it if necessary.
    pub async fn subscribe(&self, topic: K) -> broadcast::Receiver<T> {
        let mut map = self.inner.write().await;
        map.entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publishes `msg` to every current subscriber of `topic` and returns how
    /// many receivers it reached.
    pub async fn publish(&self, topic: &K, msg: T) -> usize {
        let mut map = self.inner.write().await;
        let Some(sender) = map.get(topic) else {
            return 0;
        };
        let delivered = sender.send(msg).unwrap_or(0);
        if sender.receiver_count() == 0 {
            tracing::debug!("Removing feed topic {topic:?}: no subscribers left");
            map.remove(topic);
        }
        delivered
    }

    /// Drops `rx` and removes `topic` if it was the last subscriber.
    pub async fn release(&self, topic: &K, rx: broadcast::Receiver<T>) {
        drop(rx);
        let mut map = self.inner.write().await;
        if map.get(topic).is_some_and(|s| s.receiver_count() == 0) {
            tracing::debug!("Removing feed topic {topic:?}: last subscriber released");
            map.remove(topic);
        }
    }

    pub async fn subscriber_count(&self, topic: &K) -> usize {
        self.inner
            .read()
            .await
            .get(topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    pub async fn has_topic(&self, topic: &K) -> bool {
        self.inner.read().await.contains_key(topic)
    }
}
