pub mod error;
pub mod models;
pub mod queue;

pub use error::MqError;
pub use models::{BroccoliError, BrokerMessage, MqConfig, MqQueue, init_mq};
pub use queue::{JobQueue, MemoryQueue};
