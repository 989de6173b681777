use std::sync::Arc;

use common::storage::FileStore;
use mq::JobQueue;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub files: Arc<dyn FileStore>,
    /// `None` when the queue is disabled; uploads then skip notification.
    pub queue: Option<Arc<dyn JobQueue>>,
}
