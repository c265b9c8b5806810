/// Task event relay
///
/// Routes client events through the [`ChannelRegistry`]. The relay keeps no
/// task state of its own and never checks that a task exists.

use super::events::{task_channel, ClientEvent, Frame, RelayError, TASK_CREATED, TASK_UPDATED};
use super::registry::{ChannelRegistry, ConnectionId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Publish/subscribe relay for task lifecycle events
#[derive(Default)]
pub struct Relay {
    registry: ChannelRegistry,
}

impl Relay {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            registry: ChannelRegistry::new(queue_capacity),
        }
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Registers a new client connection
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<Arc<str>>) {
        let (id, rx) = self.registry.register().await;
        info!(conn_id = %id, "User connected");
        (id, rx)
    }

    /// Forgets a client connection
    pub async fn disconnect(&self, id: ConnectionId) {
        self.registry.unregister(id).await;
        info!(conn_id = %id, "User disconnected");
    }

    /// Handles one text frame from a client
    ///
    /// Malformed or unknown frames are dropped; the client gets no reply.
    pub async fn handle_text(&self, from: ConnectionId, text: &str) -> usize {
        match ClientEvent::parse(text) {
            Ok(event) => self.dispatch(from, event).await.unwrap_or_else(|e| {
                debug!(conn_id = %from, error = %e, "Dropped client event");
                0
            }),
            Err(e) => {
                debug!(conn_id = %from, error = %e, "Ignored client frame");
                0
            }
        }
    }

    /// Routes a parsed client event
    ///
    /// Returns how many peers the event was forwarded to.
    pub async fn dispatch(&self, from: ConnectionId, event: ClientEvent) -> Result<usize, RelayError> {
        match event {
            ClientEvent::JoinTask { task_id } => {
                self.registry.join(from, &task_channel(&task_id)).await;
                Ok(0)
            }
            ClientEvent::TaskUpdated { task_id, data } => {
                let frame = Frame::new(TASK_UPDATED, data).encode()?;
                Ok(self
                    .registry
                    .send_to_topic(&task_channel(&task_id), frame, Some(from))
                    .await)
            }
            ClientEvent::TaskCreated { data } => {
                let frame = Frame::new(TASK_CREATED, data).encode()?;
                Ok(self.registry.broadcast(frame, Some(from)).await)
            }
        }
    }
}
