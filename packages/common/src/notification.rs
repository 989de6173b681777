use serde::{Deserialize, Serialize};

use crate::mq::Message;

/// Automobile fields carried in an upload notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomobileSummary {
    pub manufacturer: String,
    pub model: String,
    #[serde(rename = "type")]
    pub automobile_type: String,
}

/// Part fields carried in an upload notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSummary {
    pub name: String,
    /// Absolute URL of the uploaded file.
    pub file_link: String,
}

/// Sent from the server to the notifier after every successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub automobile: AutomobileSummary,
    pub part: PartSummary,
}

impl Message for NotificationPayload {
    fn message_type() -> &'static str {
        "send_email"
    }
}
