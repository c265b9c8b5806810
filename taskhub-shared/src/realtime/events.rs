/// Realtime wire format
///
/// Every text frame, in either direction, is a JSON object:
///
/// ```json
/// { "event": "task-updated", "data": { "taskId": 3, "status": "completed" } }
/// ```
///
/// Payloads are forwarded untouched; only the fields needed for routing
/// (`taskId`) are ever looked at.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Client joins the channel of one task
pub const JOIN_TASK: &str = "join-task";

/// A task changed; relayed to the other members of its channel
pub const TASK_UPDATED: &str = "task-updated";

/// A task was created; relayed to every other client
pub const TASK_CREATED: &str = "task-created";

/// Relay errors
#[derive(Error, Debug)]
pub enum RelayError {
    /// Frame was not a JSON `{event, data}` object
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),

    /// Event name not part of the protocol
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Event needs a task id but its payload has none
    #[error("Missing taskId in {0} payload")]
    MissingTaskId(&'static str),
}

/// A single frame on the socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Serializes the frame once so it can be shared by every recipient
    pub fn encode(&self) -> Result<Arc<str>, RelayError> {
        Ok(Arc::from(serde_json::to_string(self)?))
    }
}

/// Events a client may send
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Join the channel for `task_id`
    JoinTask { task_id: Value },

    /// Relay `data` to the channel named by `data.taskId`
    TaskUpdated { task_id: Value, data: Value },

    /// Relay `data` to everyone else
    TaskCreated { data: Value },
}

impl ClientEvent {
    /// Parses a text frame received from a client
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let frame: Frame = serde_json::from_str(text)?;
        Self::from_frame(frame)
    }

    pub fn from_frame(frame: Frame) -> Result<Self, RelayError> {
        match frame.event.as_str() {
            JOIN_TASK if frame.data.is_null() => Err(RelayError::MissingTaskId(JOIN_TASK)),
            JOIN_TASK => Ok(ClientEvent::JoinTask { task_id: frame.data }),
            TASK_UPDATED => {
                let task_id = frame
                    .data
                    .get("taskId")
                    .cloned()
                    .filter(|id| !id.is_null())
                    .ok_or(RelayError::MissingTaskId(TASK_UPDATED))?;
                Ok(ClientEvent::TaskUpdated {
                    task_id,
                    data: frame.data,
                })
            }
            TASK_CREATED => Ok(ClientEvent::TaskCreated { data: frame.data }),
            other => Err(RelayError::UnknownEvent(other.to_string())),
        }
    }
}

/// Channel name for a task: `task-{taskId}`
///
/// Numeric and string ids name the same channel (`3` and `"3"` both give
/// `task-3`).
pub fn task_channel(task_id: &Value) -> String {
    match task_id {
        Value::String(id) => format!("task-{}", id),
        other => format!("task-{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_join_task() {
        let event = ClientEvent::parse(r#"{"event": "join-task", "data": 5}"#).unwrap();
        assert_eq!(event, ClientEvent::JoinTask { task_id: json!(5) });
    }

    #[test]
    fn test_parse_join_task_without_id() {
        let err = ClientEvent::parse(r#"{"event": "join-task"}"#).unwrap_err();
        assert!(matches!(err, RelayError::MissingTaskId(JOIN_TASK)));
    }

    #[test]
    fn test_parse_task_updated() {
        let event = ClientEvent::parse(
            r#"{"event": "task-updated", "data": {"taskId": "5", "status": "completed"}}"#,
        )
        .unwrap();

        match event {
            ClientEvent::TaskUpdated { task_id, data } => {
                assert_eq!(task_id, json!("5"));
                assert_eq!(data["status"], "completed");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_task_updated_without_task_id_is_rejected() {
        let err = ClientEvent::parse(r#"{"event": "task-updated", "data": {"status": "x"}}"#)
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingTaskId(_)));
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let err = ClientEvent::parse(r#"{"event": "delete-everything"}"#).unwrap_err();
        assert!(matches!(err, RelayError::UnknownEvent(name) if name == "delete-everything"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            ClientEvent::parse("not json").unwrap_err(),
            RelayError::InvalidFrame(_)
        ));
    }

    #[test]
    fn test_task_channel_naming() {
        assert_eq!(task_channel(&json!(3)), "task-3");
        assert_eq!(task_channel(&json!("3")), "task-3");
    }

    #[test]
    fn test_frame_encode() {
        let encoded = Frame::new(TASK_CREATED, json!({"id": 1})).encode().unwrap();
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed["event"], "task-created");
        assert_eq!(parsed["data"]["id"], 1);
    }
}
