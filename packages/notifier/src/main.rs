use std::sync::Arc;

use anyhow::Context;
use common::Task;
use mq::{BroccoliError, BrokerMessage, MqConfig, init_mq};
use notifier::{Mailer, MailtrapClient, NotifierConfig, handle_task};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = NotifierConfig::load().context("Failed to load config")?;
    info!(worker_id = %config.worker.id, "Notifier starting");

    let mailer: Arc<dyn Mailer> =
        Arc::new(MailtrapClient::new(&config.mail).context("Failed to build mail client")?);

    let mq = init_mq(MqConfig {
        url: config.mq.url.clone(),
        pool_size: config.mq.pool_size,
    })
    .await
    .context("Failed to initialize MQ")?;

    let policy = config.worker.retry_policy();
    info!(
        queue_name = %config.mq.queue_name,
        concurrency = config.worker.concurrency,
        max_retries = policy.max_retries,
        "MQ connected"
    );

    let to_email = Arc::new(config.mail.to_email.clone());

    let result = mq
        .process_messages(
            &config.mq.queue_name,
            Some(config.worker.concurrency),
            None,
            move |message: BrokerMessage<Task>| {
                let mailer = Arc::clone(&mailer);
                let to_email = Arc::clone(&to_email);
                async move {
                    handle_task(message.payload, mailer.as_ref(), &to_email, &policy).await;
                    // Delivery failures are already logged; the message is acknowledged either way.
                    Ok::<(), BroccoliError>(())
                }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Notifier stopped unexpectedly");
    }

    Ok(())
}
