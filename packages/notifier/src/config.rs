use std::fmt;

use common::retry::RetryPolicy;
use config::{Config, Environment, File};
use serde::Deserialize;

pub use common::config::MqAppConfig;

use crate::error::WorkerError;

/// Worker-specific configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    /// Identifier used in logs. Default: "notifier-1".
    #[serde(default = "default_worker_id")]
    pub id: String,
    /// Messages processed concurrently. Default: 4.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Extra send attempts after a failure. Default: 0.
    #[serde(default)]
    pub max_retries: u8,
    /// Backoff before the first retry. Default: 1000.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff cap. Default: 30000.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_worker_id() -> String {
    "notifier-1".into()
}
fn default_concurrency() -> usize {
    4
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            id: default_worker_id(),
            concurrency: default_concurrency(),
            max_retries: 0,
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl WorkerConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
            max_delay_ms: self.max_delay_ms,
        }
    }
}

/// Mail API settings. `to_email`, `from_email` and `token` have no defaults.
#[derive(Deserialize, Clone)]
pub struct MailConfig {
    #[serde(default)]
    pub to_email: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://send.api.mailtrap.io/api/send".into()
}
fn default_sender_name() -> String {
    "Automobile Management System".into()
}
fn default_category() -> String {
    "Integration Test".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            to_email: String::new(),
            from_email: String::new(),
            token: String::new(),
            api_url: default_api_url(),
            sender_name: default_sender_name(),
            category: default_category(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("to_email", &self.to_email)
            .field("from_email", &self.from_email)
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("sender_name", &self.sender_name)
            .field("category", &self.category)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MailConfig {
    fn validate(&self) -> Result<(), WorkerError> {
        if self.to_email.trim().is_empty() {
            return Err(WorkerError::MissingSetting("TO_EMAIL"));
        }
        if self.from_email.trim().is_empty() {
            return Err(WorkerError::MissingSetting("FROM_EMAIL"));
        }
        if self.token.trim().is_empty() {
            return Err(WorkerError::MissingSetting("MAILTRAP_TOKEN"));
        }
        Ok(())
    }
}

/// Notifier application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct NotifierConfig {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

impl NotifierConfig {
    /// Defaults, then `config/config.toml`, then `INVENTORY__*` variables,
    /// then `TO_EMAIL`, `FROM_EMAIL` and `MAILTRAP_TOKEN`. A `.env` file in
    /// the working directory is loaded into the environment first.
    pub fn load() -> Result<Self, WorkerError> {
        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var("INVENTORY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("mq.url", "redis://localhost:6379")?
            .set_default("mq.pool_size", 5_i64)?
            .set_default("mq.queue_name", "email_notifications")?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("INVENTORY").separator("__"))
            .set_override_option("mail.to_email", std::env::var("TO_EMAIL").ok())?
            .set_override_option("mail.from_email", std::env::var("FROM_EMAIL").ok())?
            .set_override_option("mail.token", std::env::var("MAILTRAP_TOKEN").ok())?
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.mail.validate()?;
        Ok(config)
    }
}
