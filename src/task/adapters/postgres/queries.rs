//! Task statements reused inside multi-table transactions.

use super::models::TaskRow;
use crate::money::Money;
use crate::profile::domain::ProfileId;
use crate::store::schema::tasks;
use crate::task::domain::{PersistedTaskData, Task, TaskDetails, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Reads a task row and takes an exclusive row lock until commit.
pub(crate) fn lock_for_update(
    connection: &mut PgConnection,
    id: TaskId,
) -> QueryResult<Option<TaskRow>> {
    tasks::table
        .find(id.into_inner())
        .select(TaskRow::as_select())
        .for_update()
        .first::<TaskRow>(connection)
        .optional()
}

/// Reads a task row and takes a shared row lock until commit.
///
/// Shared locks block the acceptance coordinator's exclusive lock, so an
/// offer cannot slip in while a task is being matched.
pub(crate) fn lock_for_share(
    connection: &mut PgConnection,
    id: TaskId,
) -> QueryResult<Option<TaskRow>> {
    tasks::table
        .find(id.into_inner())
        .select(TaskRow::as_select())
        .for_share()
        .first::<TaskRow>(connection)
        .optional()
}

/// Marks an open task as accepted by `provider`.
///
/// Returns the number of rows changed; zero means the task was not `OPEN`.
pub(crate) fn mark_accepted(
    connection: &mut PgConnection,
    id: TaskId,
    provider: ProfileId,
    timestamp: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(
        tasks::table
            .filter(tasks::id.eq(id.into_inner()))
            .filter(tasks::status.eq(TaskStatus::Open.as_str())),
    )
    .set((
        tasks::status.eq(TaskStatus::Accepted.as_str()),
        tasks::accepted_provider_id.eq(Some(provider.into_inner())),
        tasks::updated_at.eq(timestamp),
    ))
    .execute(connection)
}

/// Builds an insert row from a task.
pub(crate) fn to_row(task: &Task) -> TaskRow {
    let details = task.details();
    TaskRow {
        id: task.id().into_inner(),
        category: details.category().to_owned(),
        title: details.title().to_owned(),
        description: details.description().to_owned(),
        budget_cents: details.budget().cents(),
        location: details.location().to_owned(),
        scheduled_for: details.scheduled_for(),
        created_by: task.created_by().into_inner(),
        status: task.status().as_str().to_owned(),
        accepted_provider_id: task.accepted_provider().map(ProfileId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

/// Error raised when a stored row violates domain rules.
#[derive(Debug, thiserror::Error)]
#[error("corrupt task row {id}: {reason}")]
pub(crate) struct CorruptTaskRow {
    id: uuid::Uuid,
    reason: String,
}

/// Reconstructs a task from a stored row.
pub(crate) fn row_to_task(row: TaskRow) -> Result<Task, CorruptTaskRow> {
    let corrupt = |reason: String| CorruptTaskRow { id: row.id, reason };
    let status = TaskStatus::try_from(row.status.as_str()).map_err(|err| corrupt(err.to_string()))?;
    let budget = Money::from_cents(row.budget_cents).map_err(|err| corrupt(err.to_string()))?;
    let details = TaskDetails::new(
        &row.category,
        &row.title,
        &row.description,
        budget,
        &row.location,
        row.scheduled_for,
    )
    .map_err(|err| corrupt(err.to_string()))?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        details,
        created_by: ProfileId::from_uuid(row.created_by),
        status,
        accepted_provider: row.accepted_provider_id.map(ProfileId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
