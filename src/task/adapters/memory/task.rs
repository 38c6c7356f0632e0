//! In-memory repository for the task store.

use async_trait::async_trait;
use std::cmp::Reverse;

use crate::profile::domain::ProfileId;
use crate::store::InMemoryStore;
use crate::task::{
    domain::{Task, TaskId, TransitionPolicy},
    ports::{StatusUpdate, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    store: InMemoryStore,
}

impl InMemoryTaskRepository {
    /// Creates a repository sharing `store` with other adapters.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tables = self.store.write().map_err(TaskRepositoryError::persistence)?;
        if tables.task(task.id()).is_some() {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tables.tasks.push(task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tables = self.store.read().map_err(TaskRepositoryError::persistence)?;
        Ok(tables.task(id).cloned())
    }

    async fn list(&self, created_by: Option<ProfileId>) -> TaskRepositoryResult<Vec<Task>> {
        let tables = self.store.read().map_err(TaskRepositoryError::persistence)?;
        // Walk newest insertions first so equal timestamps keep that order
        // through the stable sort.
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .rev()
            .filter(|task| created_by.is_none_or(|creator| task.created_by() == creator))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| Reverse(task.created_at()));
        Ok(tasks)
    }

    async fn update_status(&self, update: StatusUpdate) -> TaskRepositoryResult<Task> {
        let mut tables = self.store.write().map_err(TaskRepositoryError::persistence)?;
        let stored = tables
            .task_mut(update.task_id)
            .ok_or(TaskRepositoryError::NotFound(update.task_id))?;

        if let Some(expected) = update.expected
            && stored.status() != expected
        {
            return Err(TaskRepositoryError::StaleStatus {
                task_id: update.task_id,
                expected,
            });
        }

        let mut updated = stored.clone();
        updated
            .change_status(update.target, TransitionPolicy::Permissive, update.updated_at)
            .map_err(TaskRepositoryError::persistence)?;
        *stored = updated.clone();
        Ok(updated)
    }
}
