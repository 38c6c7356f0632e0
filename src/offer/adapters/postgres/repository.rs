//! `PostgreSQL` repository implementation for offers.

use super::{
    models::{OfferRevisionChanges, OfferRow},
    queries::{find, lock_for_update, row_to_offer, to_row},
};
use crate::chat::adapters::postgres::queries::{insert_chat, insert_message};
use crate::offer::{
    domain::{Offer, OfferId, OfferRevision, OfferStatus},
    ports::{OfferPlacement, OfferRepository, OfferRepositoryError, OfferRepositoryResult},
};
use crate::store::postgres::{PgPool, get_conn_with, run_blocking_with, unique_violation};
use crate::store::schema::offers;
use crate::task::adapters::postgres::queries::lock_for_share;
use crate::task::domain::{TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

const TASK_PROVIDER_UNIQUE_CONSTRAINT: &str = "offers_task_provider_unique";

/// `PostgreSQL`-backed offer repository.
#[derive(Debug, Clone)]
pub struct PostgresOfferRepository {
    pool: PgPool,
}

impl PostgresOfferRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> OfferRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> OfferRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, OfferRepositoryError::persistence)?;
                f(&mut connection)
            },
            OfferRepositoryError::persistence,
        )
        .await
    }
}

impl From<diesel::result::Error> for OfferRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

/// Takes a shared lock on the task and fails unless it is open.
fn lock_open_task(connection: &mut PgConnection, task_id: TaskId) -> OfferRepositoryResult<()> {
    let task = lock_for_share(connection, task_id)?
        .ok_or(OfferRepositoryError::TaskNotFound(task_id))?;
    if task.status != TaskStatus::Open.as_str() {
        let status = TaskStatus::try_from(task.status.as_str())
            .map_err(OfferRepositoryError::persistence)?;
        return Err(OfferRepositoryError::TaskNotOpen { task_id, status });
    }
    Ok(())
}

#[async_trait]
impl OfferRepository for PostgresOfferRepository {
    async fn store_with_chat(&self, placement: &OfferPlacement) -> OfferRepositoryResult<()> {
        let owned = placement.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, OfferRepositoryError, _>(|tx| {
                let offer = &owned.offer;
                lock_open_task(tx, offer.task_id())?;

                diesel::insert_into(offers::table)
                    .values(&to_row(offer))
                    .execute(tx)
                    .map_err(|err| match unique_violation(&err).as_deref() {
                        Some(TASK_PROVIDER_UNIQUE_CONSTRAINT) => {
                            OfferRepositoryError::DuplicateOffer {
                                task_id: offer.task_id(),
                                provider_id: offer.provider_id(),
                            }
                        }
                        _ => OfferRepositoryError::persistence(err),
                    })?;
                insert_chat(tx, &owned.chat).map_err(|err| match unique_violation(&err) {
                    Some(_) => OfferRepositoryError::DuplicateChat(owned.chat.offer_id()),
                    None => OfferRepositoryError::persistence(err),
                })?;
                insert_message(tx, &owned.opening)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: OfferId) -> OfferRepositoryResult<Option<Offer>> {
        self.run_blocking(move |connection| {
            find(connection, id)?
                .map(row_to_offer)
                .transpose()
                .map_err(OfferRepositoryError::persistence)
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> OfferRepositoryResult<Vec<Offer>> {
        self.run_blocking(move |connection| {
            offers::table
                .filter(offers::task_id.eq(task_id.into_inner()))
                .order((offers::created_at.asc(), offers::id.asc()))
                .select(OfferRow::as_select())
                .load::<OfferRow>(connection)?
                .into_iter()
                .map(|row| row_to_offer(row).map_err(OfferRepositoryError::persistence))
                .collect()
        })
        .await
    }

    async fn update_pending(
        &self,
        id: OfferId,
        revision: &OfferRevision,
        updated_at: DateTime<Utc>,
    ) -> OfferRepositoryResult<Offer> {
        let changes = OfferRevisionChanges {
            price_cents: revision.price().map(|price| price.cents()),
            message: revision.message().map(str::to_owned),
            updated_at,
        };
        self.run_blocking(move |connection| {
            connection.transaction::<_, OfferRepositoryError, _>(|tx| {
                let task_id = find(tx, id)?
                    .map(|row| TaskId::from_uuid(row.task_id))
                    .ok_or(OfferRepositoryError::NotFound(id))?;
                lock_open_task(tx, task_id)?;

                let current = lock_for_update(tx, id)?.ok_or(OfferRepositoryError::NotFound(id))?;
                if current.status != OfferStatus::Pending.as_str() {
                    let status = OfferStatus::try_from(current.status.as_str())
                        .map_err(OfferRepositoryError::persistence)?;
                    return Err(OfferRepositoryError::NotPending {
                        offer_id: id,
                        status,
                    });
                }

                let updated = diesel::update(offers::table.find(id.into_inner()))
                    .set(&changes)
                    .returning(OfferRow::as_returning())
                    .get_result::<OfferRow>(tx)?;
                row_to_offer(updated).map_err(OfferRepositoryError::persistence)
            })
        })
        .await
    }
}
