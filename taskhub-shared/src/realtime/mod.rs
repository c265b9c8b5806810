/// Realtime relay
///
/// A thin publish/subscribe layer over per-client socket connections:
///
/// - `registry`: topic → subscriber set, with send-to-topic and broadcast
/// - `events`: JSON frame format and client event parsing
/// - `relay`: routes `join-task`, `task-updated` and `task-created`
///
/// The relay is driven only by client events. It is not connected to the
/// database, so what it broadcasts may disagree with stored state.

pub mod events;
pub mod registry;
pub mod relay;

pub use events::{ClientEvent, Frame, RelayError};
pub use registry::{ChannelRegistry, ConnectionId};
pub use relay::Relay;
