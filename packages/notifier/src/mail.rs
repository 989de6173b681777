use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::MailConfig;
use crate::error::MailError;

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    text: &'a str,
    category: &'a str,
}

/// Client for the Mailtrap send API.
pub struct MailtrapClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    from_email: String,
    sender_name: String,
    category: String,
}

impl MailtrapClient {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            from_email: config.from_email.clone(),
            sender_name: config.sender_name.clone(),
            category: config.category.clone(),
        })
    }
}

#[async_trait]
impl Mailer for MailtrapClient {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let request = SendRequest {
            from: Address {
                email: &self.from_email,
                name: Some(&self.sender_name),
            },
            to: vec![Address {
                email: &email.to,
                name: None,
            }],
            subject: &email.subject,
            text: &email.text,
            category: &self.category,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %email.to, status = status.as_u16(), "Mail API accepted message");
        Ok(())
    }
}
