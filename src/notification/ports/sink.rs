//! Notification sink port.

use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification sink operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Receives best-effort notification intents.
///
/// Callers never wait on the outcome; failures are logged and dropped.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Announces `task_id` to every service provider.
    async fn notify_service_providers(&self, task_id: TaskId) -> NotificationResult<()>;
}

/// Errors returned by notification sinks.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// Recipients could not be resolved.
    #[error("failed to resolve notification recipients: {0}")]
    Recipients(Arc<dyn std::error::Error + Send + Sync>),

    /// The downstream channel rejected the notification.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

impl NotificationError {
    /// Wraps a recipient lookup failure.
    pub fn recipients(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Recipients(Arc::new(err))
    }
}
