pub mod config;
pub mod mq;
pub mod notification;
pub mod retry;
pub mod storage;

pub use mq::{Message, MessageError, Task};
pub use notification::{AutomobileSummary, NotificationPayload, PartSummary};
