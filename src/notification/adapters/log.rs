//! Notification sink that records one mock notification per provider.

use async_trait::async_trait;
use std::sync::Arc;

use crate::notification::ports::{NotificationError, NotificationResult, NotificationSink};
use crate::profile::{domain::ProfileRole, ports::ProfileDirectory};
use crate::task::domain::TaskId;

/// Logs a notification for every registered service provider.
#[derive(Clone)]
pub struct LoggingNotificationSink<D>
where
    D: ProfileDirectory,
{
    directory: Arc<D>,
}

impl<D> LoggingNotificationSink<D>
where
    D: ProfileDirectory,
{
    /// Creates a sink resolving recipients through `directory`.
    #[must_use]
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> NotificationSink for LoggingNotificationSink<D>
where
    D: ProfileDirectory,
{
    async fn notify_service_providers(&self, task_id: TaskId) -> NotificationResult<()> {
        let providers = self
            .directory
            .list_by_role(ProfileRole::ServiceProvider)
            .await
            .map_err(NotificationError::recipients)?;

        for provider in &providers {
            tracing::info!(
                task_id = %task_id,
                profile_id = %provider.id(),
                "mock notification sent"
            );
        }
        tracing::info!(
            task_id = %task_id,
            recipients = providers.len(),
            "notification process completed"
        );
        Ok(())
    }
}
