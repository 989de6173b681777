use common::retry::RetryPolicy;
use common::{Message, NotificationPayload, Task};
use tracing::{error, info, warn};

use crate::mail::{Email, Mailer};

/// How a `send_email` job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { attempts: u8 },
    Failed { attempts: u8, error: String },
}

pub fn render_email(payload: &NotificationPayload, to: &str) -> Email {
    let automobile = &payload.automobile;
    let part = &payload.part;

    let subject = format!(
        "New File Uploaded for {} {}",
        automobile.manufacturer, automobile.model
    );
    let text = format!(
        "Hello,\n\
         \n\
         A new file was uploaded for the following automobile:\n\
         \n\
         Manufacturer: {}\n\
         Model: {}\n\
         Type: {}\n\
         \n\
         Part: {}\n\
         File Link: {}\n\
         \n\
         Regards,\n\
         Email Service",
        automobile.manufacturer,
        automobile.model,
        automobile.automobile_type,
        part.name,
        part.file_link,
    );

    Email {
        to: to.to_string(),
        subject,
        text,
    }
}

/// Send `email`, retrying per `policy`. Never returns an error.
pub async fn deliver(mailer: &dyn Mailer, email: &Email, policy: &RetryPolicy) -> DeliveryOutcome {
    let mut attempts: u8 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        match mailer.send(email).await {
            Ok(()) => return DeliveryOutcome::Sent { attempts },
            Err(e) => match policy.delay_for(attempts) {
                Some(delay) => {
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Email send failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return DeliveryOutcome::Failed {
                        attempts,
                        error: e.to_string(),
                    };
                }
            },
        }
    }
}

/// Process one task from the queue.
///
/// Returns `None` when the task is skipped: an unknown type or a payload that
/// does not decode.
pub async fn handle_task(
    task: Task,
    mailer: &dyn Mailer,
    to_email: &str,
    policy: &RetryPolicy,
) -> Option<DeliveryOutcome> {
    let task_id = task.id.clone();

    if task.task_type != NotificationPayload::message_type() {
        warn!(task_id = %task_id, task_type = %task.task_type, "Unknown task type, skipping");
        return None;
    }

    let payload: NotificationPayload = match task.into_message() {
        Ok(p) => p,
        Err(e) => {
            error!(task_id = %task_id, error = %e, "Dropping undecodable notification");
            return None;
        }
    };

    let email = render_email(&payload, to_email);
    let outcome = deliver(mailer, &email, policy).await;

    match &outcome {
        DeliveryOutcome::Sent { attempts } => {
            info!(
                task_id = %task_id,
                attempts,
                subject = %email.subject,
                "Notification sent"
            );
        }
        DeliveryOutcome::Failed { attempts, error } => {
            error!(
                task_id = %task_id,
                attempts,
                error = %error,
                "Notification failed"
            );
        }
    }

    Some(outcome)
}
