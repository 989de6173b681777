use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

/// Core trait for all MQ messages
pub trait Message: Serialize + DeserializeOwned + Debug + Send + Sync + Clone {
    /// Name the consumer dispatches on.
    fn message_type() -> &'static str
    where
        Self: Sized;
}

/// Envelope published on the queue. The consumer picks a handler by `task_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub task_type: String,
    pub payload: serde_json::Value,
}

impl Task {
    /// Wrap a typed message in a new envelope with a fresh UUID.
    pub fn from_message<M: Message>(message: &M) -> Result<Self, MessageError> {
        let task = Self {
            id: Uuid::new_v4().to_string(),
            task_type: M::message_type().to_string(),
            payload: serde_json::to_value(message)?,
        };

        debug!(
            task_id = %task.id,
            task_type = %task.task_type,
            "Created task envelope"
        );

        Ok(task)
    }

    /// Deserialize the payload into a typed message.
    pub fn into_message<M: Message>(self) -> Result<M, MessageError> {
        if self.task_type != M::message_type() {
            error!(
                expected = M::message_type(),
                actual = %self.task_type,
                task_id = %self.id,
                "Task type mismatch"
            );
            return Err(MessageError::TypeMismatch {
                expected: M::message_type().to_string(),
                actual: self.task_type,
            });
        }

        serde_json::from_value(self.payload).map_err(|e| {
            error!(error = %e, task_id = %self.id, "Deserialization failed");
            MessageError::Serialization(e)
        })
    }
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Message type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}
