//! `PostgreSQL` acceptance transaction.
//!
//! Lock order is task row, then offer row. Offer placement and revision take
//! the task lock first as well, so concurrent writers queue on the task
//! instead of deadlocking.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::acceptance::{
    domain::{AcceptOffer, AcceptedOffer},
    ports::{AcceptanceRepository, AcceptanceRepositoryError, AcceptanceRepositoryResult},
};
use crate::chat::adapters::postgres::queries as chat_queries;
use crate::chat::domain::{ChatId, ChatMessage, MessageKind};
use crate::offer::adapters::postgres::queries as offer_queries;
use crate::offer::domain::OfferStatus;
use crate::profile::domain::ProfileId;
use crate::store::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::task::adapters::postgres::queries as task_queries;
use crate::task::domain::{TaskId, TaskStatus};

/// `PostgreSQL`-backed acceptance repository.
#[derive(Debug, Clone)]
pub struct PostgresAcceptanceRepository {
    pool: PgPool,
}

impl PostgresAcceptanceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<diesel::result::Error> for AcceptanceRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl AcceptanceRepository for PostgresAcceptanceRepository {
    async fn accept(&self, command: &AcceptOffer) -> AcceptanceRepositoryResult<AcceptedOffer> {
        let pool = self.pool.clone();
        let owned = command.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, AcceptanceRepositoryError::persistence)?;
                connection.transaction::<_, AcceptanceRepositoryError, _>(|tx| {
                    apply_acceptance(tx, &owned)
                })
            },
            AcceptanceRepositoryError::persistence,
        )
        .await
    }
}

fn apply_acceptance(
    tx: &mut PgConnection,
    command: &AcceptOffer,
) -> AcceptanceRepositoryResult<AcceptedOffer> {
    let offer_id = command.offer_id;
    let at = command.accepted_at;

    let task_id = offer_queries::find(tx, offer_id)?
        .map(|row| TaskId::from_uuid(row.task_id))
        .ok_or(AcceptanceRepositoryError::OfferNotFound(offer_id))?;
    let task = task_queries::lock_for_update(tx, task_id)?
        .ok_or(AcceptanceRepositoryError::TaskNotFound(task_id))?;
    let offer = offer_queries::lock_for_update(tx, offer_id)?
        .ok_or(AcceptanceRepositoryError::OfferNotFound(offer_id))?;

    if offer.status != OfferStatus::Pending.as_str() {
        return Err(AcceptanceRepositoryError::AlreadyResolved {
            offer_id,
            status: parse_offer_status(&offer.status)?,
        });
    }
    let provider_id = ProfileId::from_uuid(offer.provider_id);
    if task_queries::mark_accepted(tx, task_id, provider_id, at)? == 0 {
        return Err(AcceptanceRepositoryError::TaskNotOpen {
            task_id,
            status: TaskStatus::try_from(task.status.as_str())
                .map_err(AcceptanceRepositoryError::persistence)?,
        });
    }
    if offer_queries::mark_accepted(tx, offer_id, at)? == 0 {
        return Err(AcceptanceRepositoryError::AlreadyResolved {
            offer_id,
            status: parse_offer_status(&offer.status)?,
        });
    }
    let rejected = offer_queries::reject_others(tx, task_id, offer_id, at)?;
    let deactivated = chat_queries::deactivate_siblings(tx, task_id, offer_id, at)?;

    let chat_id = chat_queries::find_by_offer(tx, offer_id)?
        .map(|row| ChatId::from_uuid(row.id))
        .ok_or(AcceptanceRepositoryError::ChatMissing(offer_id))?;
    let announcement = ChatMessage::new_at(
        chat_id,
        ProfileId::from_uuid(task.created_by),
        command.announcement.as_str(),
        MessageKind::System,
        at,
    )
    .map_err(AcceptanceRepositoryError::persistence)?;
    chat_queries::insert_message(tx, &announcement)?;

    tracing::debug!(
        task_id = %task_id,
        offer_id = %offer_id,
        rejected,
        deactivated,
        "acceptance applied"
    );
    Ok(AcceptedOffer {
        task_id,
        offer_id,
        provider_id,
        chat_id,
    })
}

fn parse_offer_status(raw: &str) -> AcceptanceRepositoryResult<OfferStatus> {
    OfferStatus::try_from(raw).map_err(AcceptanceRepositoryError::persistence)
}

