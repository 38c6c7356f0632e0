//! Service layer for task creation, retrieval, and status updates.

use crate::error::{Classify, ErrorKind, trace_failure};
use crate::money::Money;
use crate::notification::ports::NotificationSink;
use crate::profile::{
    domain::ProfileId,
    ports::{ProfileDirectory, ProfileDirectoryError},
};
use crate::task::{
    domain::{
        ParseTaskStatusError, Task, TaskDetails, TaskDomainError, TaskId, TaskStatus,
        TransitionPolicy,
    },
    ports::{StatusUpdate, TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request payload for posting a task.
///
/// Fields carry raw caller input; validation happens in
/// [`TaskLifecycleService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    /// Task category.
    pub category: String,
    /// Short task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Budget as a decimal string such as `"150.00"`.
    pub budget: String,
    /// Where the work takes place.
    pub location: String,
    /// Requested date as `YYYY-MM-DD`.
    pub date: String,
    /// Customer posting the task.
    pub created_by: ProfileId,
}

/// Request payload for an explicit status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    status: String,
}

impl UpdateTaskStatusRequest {
    /// Creates a request writing the raw `status` literal to `task_id`.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
        }
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a transition rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The status literal is not a known task status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The creator profile does not exist.
    #[error("creator profile not found: {0}")]
    CreatorNotFound(ProfileId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Profile lookup failed.
    #[error(transparent)]
    Directory(#[from] ProfileDirectoryError),
}

impl Classify for TaskLifecycleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(
                TaskDomainError::NotOpen { .. } | TaskDomainError::InvalidStatusTransition { .. },
            ) => ErrorKind::Conflict,
            Self::Domain(_) | Self::InvalidStatus(_) => ErrorKind::Validation,
            Self::NotFound(_)
            | Self::CreatorNotFound(_)
            | Self::Repository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Repository(
                TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::StaleStatus { .. },
            ) => ErrorKind::Conflict,
            Self::Repository(TaskRepositoryError::Persistence(_)) | Self::Directory(_) => {
                ErrorKind::Store
            }
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task posting and status orchestration service.
pub struct TaskLifecycleService<R, D, N, C>
where
    R: TaskRepository,
    D: ProfileDirectory,
    N: NotificationSink + 'static,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
    policy: TransitionPolicy,
}

impl<R, D, N, C> Clone for TaskLifecycleService<R, D, N, C>
where
    R: TaskRepository,
    D: ProfileDirectory,
    N: NotificationSink + 'static,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
            notifier: Arc::clone(&self.notifier),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<R, D, N, C> TaskLifecycleService<R, D, N, C>
where
    R: TaskRepository,
    D: ProfileDirectory,
    N: NotificationSink + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service using the permissive policy.
    #[must_use]
    pub fn new(repository: Arc<R>, directory: Arc<D>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            notifier,
            clock,
            policy: TransitionPolicy::default(),
        }
    }

    /// Sets the rules applied to explicit status updates.
    #[must_use]
    pub const fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Posts a new open task and asks the notification sink to announce it.
    ///
    /// The announcement runs in the background; its failure is logged and
    /// never fails creation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when input validation fails, the
    /// creator is unknown, or the repository rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let result = self.create_inner(&request).await;
        if let Err(err) = &result {
            trace_failure("task.create", err);
        }
        result
    }

    async fn create_inner(&self, request: &CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let budget = Money::parse(&request.budget).map_err(TaskDomainError::from)?;
        let date = NaiveDate::parse_from_str(request.date.trim(), DATE_FORMAT)
            .map_err(|_| TaskDomainError::InvalidDate(request.date.clone()))?;
        let details = TaskDetails::new(
            &request.category,
            &request.title,
            &request.description,
            budget,
            &request.location,
            date,
        )?;

        if self
            .directory
            .find_by_id(request.created_by)
            .await?
            .is_none()
        {
            return Err(TaskLifecycleError::CreatorNotFound(request.created_by));
        }

        let task = Task::new(details, request.created_by, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), created_by = %task.created_by(), "task created");

        self.announce(task.id());
        Ok(task)
    }

    fn announce(&self, task_id: TaskId) {
        let notifier = Arc::clone(&self.notifier);
        drop(tokio::spawn(async move {
            if let Err(err) = notifier.notify_service_providers(task_id).await {
                tracing::warn!(task_id = %task_id, error = %err, "provider notification failed");
            }
        }));
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn find(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Lists tasks newest first, optionally restricted to one creator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list(&self, created_by: Option<ProfileId>) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list(created_by).await?)
    }

    /// Writes a new status to a task.
    ///
    /// Under [`TransitionPolicy::Strict`] the move must follow the lifecycle
    /// graph and the write only applies if the status read here is still
    /// current.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the literal is unknown, the task
    /// does not exist, or the policy rejects the move.
    pub async fn update_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<Task> {
        let result = self.update_status_inner(&request).await;
        if let Err(err) = &result {
            trace_failure("task.update_status", err);
        }
        result
    }

    async fn update_status_inner(
        &self,
        request: &UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<Task> {
        let target = TaskStatus::try_from(request.status.as_str())?;
        let timestamp = self.clock.utc();

        let expected = match self.policy {
            TransitionPolicy::Permissive => None,
            TransitionPolicy::Strict => {
                let mut task = self.find(request.task_id).await?;
                let current = task.status();
                task.change_status(target, self.policy, timestamp)?;
                Some(current)
            }
        };

        let task = self
            .repository
            .update_status(StatusUpdate {
                task_id: request.task_id,
                expected,
                target,
                updated_at: timestamp,
            })
            .await?;
        tracing::info!(task_id = %task.id(), status = %task.status(), "task status updated");
        Ok(task)
    }
}
