//! `PostgreSQL` repository implementation for the task store.

use super::{
    models::TaskRow,
    queries::{lock_for_update, row_to_task, to_row},
};
use crate::profile::domain::ProfileId;
use crate::store::postgres::{PgPool, get_conn_with, run_blocking_with, unique_violation};
use crate::store::schema::tasks;
use crate::task::{
    domain::{Task, TaskId},
    ports::{StatusUpdate, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match unique_violation(&err) {
                    Some(_) => TaskRepositoryError::DuplicateTask(task_id),
                    None => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task)
                .transpose()
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn list(&self, created_by: Option<ProfileId>) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .into_boxed();
            if let Some(creator) = created_by {
                query = query.filter(tasks::created_by.eq(creator.into_inner()));
            }
            query
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(|row| row_to_task(row).map_err(TaskRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn update_status(&self, update: StatusUpdate) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let row = lock_for_update(tx, update.task_id)?
                    .ok_or(TaskRepositoryError::NotFound(update.task_id))?;

                if let Some(expected) = update.expected
                    && row.status != expected.as_str()
                {
                    return Err(TaskRepositoryError::StaleStatus {
                        task_id: update.task_id,
                        expected,
                    });
                }

                let updated = diesel::update(tasks::table.find(update.task_id.into_inner()))
                    .set((
                        tasks::status.eq(update.target.as_str()),
                        tasks::updated_at.eq(update.updated_at),
                    ))
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(tx)?;
                row_to_task(updated).map_err(TaskRepositoryError::persistence)
            })
        })
        .await
    }
}
