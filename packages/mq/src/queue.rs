use std::sync::Mutex;

use async_trait::async_trait;
use common::mq::Task;
use tracing::debug;

use crate::error::MqError;
use crate::models::BroccoliQueue;

/// Publishing side of the job queue, injected into the HTTP layer.
///
/// Publishing is fire-and-forget: `Ok` means the broker accepted the task,
/// not that any consumer has processed it.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn publish_task(&self, queue_name: &str, task: &Task) -> Result<(), MqError>;
}

#[async_trait]
impl JobQueue for BroccoliQueue {
    async fn publish_task(&self, queue_name: &str, task: &Task) -> Result<(), MqError> {
        self.publish(queue_name, None, task, None).await?;
        debug!(queue = %queue_name, task_id = %task.id, "Task published");
        Ok(())
    }
}

/// In-process queue that only records what was published.
///
/// Used where no broker is available, such as tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    published: Mutex<Vec<(String, Task)>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(queue_name, task)` pair published so far, oldest first.
    pub fn published(&self) -> Vec<(String, Task)> {
        self.published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn publish_task(&self, queue_name: &str, task: &Task) -> Result<(), MqError> {
        self.published
            .lock()
            .map_err(|_| MqError::Broker("memory queue lock poisoned".into()))?
            .push((queue_name.to_string(), task.clone()));
        Ok(())
    }
}
