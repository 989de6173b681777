pub mod config;
pub mod error;
pub mod mail;
pub mod notification;

pub use config::{MailConfig, NotifierConfig, WorkerConfig};
pub use error::{MailError, WorkerError};
pub use mail::{Email, Mailer, MailtrapClient};
pub use notification::{DeliveryOutcome, handle_task, render_email};
