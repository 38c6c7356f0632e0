//! Task aggregate root and its posting details.

use super::{TaskDomainError, TaskId, TaskStatus, TransitionPolicy};
use crate::money::Money;
use crate::profile::domain::ProfileId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated details a customer supplies when posting a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    category: String,
    title: String,
    description: String,
    budget: Money,
    location: String,
    scheduled_for: NaiveDate,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// Text fields are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] naming the first blank field.
    pub fn new(
        category: &str,
        title: &str,
        description: &str,
        budget: Money,
        location: &str,
        scheduled_for: NaiveDate,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            category: required("category", category)?,
            title: required("title", title)?,
            description: required("description", description)?,
            budget,
            location: required("location", location)?,
            scheduled_for,
        })
    }

    /// Returns the task category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the customer's budget.
    #[must_use]
    pub const fn budget(&self) -> Money {
        self.budget
    }

    /// Returns where the work takes place.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the requested date.
    #[must_use]
    pub const fn scheduled_for(&self) -> NaiveDate {
        self.scheduled_for
    }
}

fn required(field: &'static str, value: &str) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    details: TaskDetails,
    created_by: ProfileId,
    status: TaskStatus,
    accepted_provider: Option<ProfileId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted posting details.
    pub details: TaskDetails,
    /// Persisted creator.
    pub created_by: ProfileId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted accepted provider, if any.
    pub accepted_provider: Option<ProfileId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task posted by `created_by`.
    #[must_use]
    pub fn new(details: TaskDetails, created_by: ProfileId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            details,
            created_by,
            status: TaskStatus::Open,
            accepted_provider: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            details: data.details,
            created_by: data.created_by,
            status: data.status,
            accepted_provider: data.accepted_provider,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the posting details.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the customer who posted the task.
    #[must_use]
    pub const fn created_by(&self) -> ProfileId {
        self.created_by
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the provider whose offer was accepted, if any.
    #[must_use]
    pub const fn accepted_provider(&self) -> Option<ProfileId> {
        self.accepted_provider
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Fails unless the task is still soliciting offers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotOpen`] for any status other than `OPEN`.
    pub const fn ensure_open(&self) -> Result<(), TaskDomainError> {
        if matches!(self.status, TaskStatus::Open) {
            Ok(())
        } else {
            Err(TaskDomainError::NotOpen {
                task_id: self.id,
                status: self.status,
            })
        }
    }

    /// Records the match with `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotOpen`] unless the task is `OPEN`.
    pub fn accept(
        &mut self,
        provider: ProfileId,
        timestamp: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        self.status = TaskStatus::Accepted;
        self.accepted_provider = Some(provider);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Applies an explicit status update under `policy`.
    ///
    /// The accepted provider is left untouched so a cancelled or completed
    /// task still records who it was matched with.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when `policy`
    /// forbids the move.
    pub fn change_status(
        &mut self,
        target: TaskStatus,
        policy: TransitionPolicy,
        timestamp: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if !policy.permits(self.status, target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = timestamp;
        Ok(())
    }
}
