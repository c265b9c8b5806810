/// Channel registry
///
/// Maps each topic to the set of connections that joined it and each
/// connection to its bounded outbound queue.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier of one connected client
pub type ConnectionId = Uuid;

/// Outbound queue depth per connection when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Default)]
struct Inner {
    /// Outbound queue of every live connection
    connections: HashMap<ConnectionId, mpsc::Sender<Arc<str>>>,
    /// Members of each topic
    topics: HashMap<String, HashSet<ConnectionId>>,
}

/// Tracks live connections and the topics they joined.
///
/// Sending never blocks: a full or closed queue drops the frame for that
/// connection only.
pub struct ChannelRegistry {
    inner: RwLock<Inner>,
    queue_capacity: usize,
}

impl ChannelRegistry {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Registers a connection and returns its id and outbound queue.
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let id = Uuid::new_v4();
        self.inner.write().await.connections.insert(id, tx);
        (id, rx)
    }

    /// Removes a connection from the registry and from every topic.
    pub async fn unregister(&self, id: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.connections.remove(&id);
        inner.topics.retain(|_, members| {
            members.remove(&id);
            !members.is_empty()
        });
    }

    /// Adds a connection to a topic. Returns false for unknown connections.
    pub async fn join(&self, id: ConnectionId, topic: &str) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.connections.contains_key(&id) {
            warn!(conn_id = %id, topic, "join from unknown connection");
            return false;
        }
        inner
            .topics
            .entry(topic.to_string())
            .or_default()
            .insert(id);
        debug!(conn_id = %id, topic, "joined topic");
        true
    }

    /// Sends a frame to every member of `topic` except `except`.
    ///
    /// Returns the number of connections the frame was queued for.
    pub async fn send_to_topic(
        &self,
        topic: &str,
        frame: Arc<str>,
        except: Option<ConnectionId>,
    ) -> usize {
        let inner = self.inner.read().await;
        let Some(members) = inner.topics.get(topic) else {
            debug!(topic, "no members for topic");
            return 0;
        };

        let delivered = members
            .iter()
            .filter(|id| Some(**id) != except)
            .filter_map(|id| inner.connections.get(id).map(|tx| (id, tx)))
            .filter(|(id, tx)| deliver(**id, tx, &frame))
            .count();

        debug!(topic, delivered, "sent frame to topic");
        delivered
    }

    /// Sends a frame to every connection except `except`.
    pub async fn broadcast(&self, frame: Arc<str>, except: Option<ConnectionId>) -> usize {
        let inner = self.inner.read().await;

        let delivered = inner
            .connections
            .iter()
            .filter(|(id, _)| Some(**id) != except)
            .filter(|(id, tx)| deliver(**id, tx, &frame))
            .count();

        debug!(delivered, "broadcast frame");
        delivered
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Number of members in a topic.
    pub async fn topic_members(&self, topic: &str) -> usize {
        self.inner
            .read()
            .await
            .topics
            .get(topic)
            .map_or(0, HashSet::len)
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

fn deliver(id: ConnectionId, tx: &mpsc::Sender<Arc<str>>, frame: &Arc<str>) -> bool {
    match tx.try_send(Arc::clone(frame)) {
        Ok(()) => true,
        Err(e) => {
            warn!(conn_id = %id, error = %e, "dropped frame for client");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> Arc<str> {
        Arc::from(text)
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let registry = ChannelRegistry::default();
        let (a, _rx_a) = registry.register().await;
        let (b, _rx_b) = registry.register().await;
        assert_ne!(a, b);
        assert_eq!(registry.connection_count().await, 2);

        registry.unregister(a).await;
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_unregister_leaves_all_topics() {
        let registry = ChannelRegistry::default();
        let (a, _rx) = registry.register().await;
        assert!(registry.join(a, "task-1").await);
        assert_eq!(registry.topic_members("task-1").await, 1);

        registry.unregister(a).await;
        assert_eq!(registry.topic_members("task-1").await, 0);
    }

    #[tokio::test]
    async fn test_join_unknown_connection_is_refused() {
        let registry = ChannelRegistry::default();
        assert!(!registry.join(Uuid::new_v4(), "task-1").await);
        assert_eq!(registry.topic_members("task-1").await, 0);
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let registry = ChannelRegistry::default();
        let (a, _rx) = registry.register().await;
        registry.join(a, "task-1").await;
        registry.join(a, "task-1").await;
        assert_eq!(registry.topic_members("task-1").await, 1);
    }

    #[tokio::test]
    async fn test_send_to_topic_skips_sender_and_non_members() {
        let registry = ChannelRegistry::default();
        let (a, mut rx_a) = registry.register().await;
        let (b, mut rx_b) = registry.register().await;
        let (_c, mut rx_c) = registry.register().await;
        registry.join(a, "task-1").await;
        registry.join(b, "task-1").await;

        let delivered = registry.send_to_topic("task-1", frame("hi"), Some(a)).await;
        assert_eq!(delivered, 1);

        assert_eq!(&*rx_b.try_recv().unwrap(), "hi");
        assert!(rx_a.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_empty_topic() {
        let registry = ChannelRegistry::default();
        let (_a, _rx) = registry.register().await;
        assert_eq!(registry.send_to_topic("task-9", frame("x"), None).await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_skips_sender() {
        let registry = ChannelRegistry::default();
        let (a, mut rx_a) = registry.register().await;
        let (_b, mut rx_b) = registry.register().await;
        let (_c, mut rx_c) = registry.register().await;

        assert_eq!(registry.broadcast(frame("new"), Some(a)).await, 2);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(&*rx_b.try_recv().unwrap(), "new");
        assert_eq!(&*rx_c.try_recv().unwrap(), "new");
    }

    #[tokio::test]
    async fn test_full_queue_drops_frame_for_that_client_only() {
        let registry = ChannelRegistry::new(1);
        let (_a, mut rx_a) = registry.register().await;
        let (_b, _rx_b) = registry.register().await;

        assert_eq!(registry.broadcast(frame("1"), None).await, 2);
        // Neither queue was drained, so both are full now.
        assert_eq!(registry.broadcast(frame("2"), None).await, 0);

        assert_eq!(&*rx_a.try_recv().unwrap(), "1");
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_receiver_is_not_counted() {
        let registry = ChannelRegistry::default();
        let (_a, rx_a) = registry.register().await;
        let (_b, mut rx_b) = registry.register().await;
        drop(rx_a);

        assert_eq!(registry.broadcast(frame("x"), None).await, 1);
        assert!(rx_b.try_recv().is_ok());
    }
}
