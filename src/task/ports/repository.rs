//! Repository port for task persistence and lookup.

use crate::profile::domain::ProfileId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Status write that touches only the status and update timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Task to update.
    pub task_id: TaskId,
    /// Status the row must still hold for the write to apply, if any.
    pub expected: Option<TaskStatus>,
    /// Status to write.
    pub target: TaskStatus,
    /// New update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks newest first, optionally restricted to one creator.
    async fn list(&self, created_by: Option<ProfileId>) -> TaskRepositoryResult<Vec<Task>>;

    /// Writes a new status and returns the stored task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::StaleStatus`] when `update.expected` no
    /// longer matches the stored status.
    async fn update_status(&self, update: StatusUpdate) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task changed status since it was read.
    #[error("task {task_id} is no longer {expected}")]
    StaleStatus {
        /// The task being updated.
        task_id: TaskId,
        /// The status the caller based its decision on.
        expected: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
