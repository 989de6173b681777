use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),
}

/// Failure to hand an email to the mail API.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
