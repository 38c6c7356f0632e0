//! Throwaway schemas for `PostgreSQL` integration tests.
//!
//! Tests run only when `TASKPANDA_TEST_DATABASE_URL` names a reachable
//! database. Each test gets its own schema, dropped when the guard goes out of
//! scope.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use rstest::fixture;
use taskpanda::store::PostgresStore;
use uuid::Uuid;

use crate::test_helpers::{BoxError, Marketplace};
use taskpanda::acceptance::adapters::postgres::PostgresAcceptanceRepository;
use taskpanda::chat::adapters::postgres::PostgresChatRepository;
use taskpanda::offer::adapters::postgres::PostgresOfferRepository;
use taskpanda::profile::adapters::postgres::PostgresProfileDirectory;
use taskpanda::task::adapters::postgres::PostgresTaskRepository;
use std::sync::Arc;

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL: &str = "TASKPANDA_TEST_DATABASE_URL";

/// Marketplace over every `PostgreSQL` adapter.
pub type PostgresMarketplace = Marketplace<
    PostgresTaskRepository,
    PostgresOfferRepository,
    PostgresChatRepository,
    PostgresAcceptanceRepository,
    PostgresProfileDirectory,
>;

#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated schema private to one test.
pub struct TestDatabase {
    url: String,
    schema: String,
    store: PostgresStore,
}

impl TestDatabase {
    /// Creates and migrates a fresh schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable or migration fails.
    pub async fn create(url: String) -> Result<Self, BoxError> {
        let schema = format!("taskpanda_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(&url)?;
        admin.batch_execute(&format!("CREATE SCHEMA {schema}"))?;

        let pool = Pool::builder()
            .max_size(8)
            .connection_customizer(Box::new(SearchPath(schema.clone())))
            .build(ConnectionManager::<PgConnection>::new(url.as_str()))?;
        let store = PostgresStore::from_pool(pool);
        store.migrate().await?;
        Ok(Self { url, schema, store })
    }

    /// Returns the store bound to this schema.
    pub const fn store(&self) -> &PostgresStore {
        &self.store
    }

    /// Wires a marketplace over this schema.
    pub fn marketplace(&self) -> PostgresMarketplace {
        Marketplace::wire(
            Arc::new(self.store.task_repository()),
            Arc::new(self.store.offer_repository()),
            Arc::new(self.store.chat_repository()),
            Arc::new(self.store.acceptance_repository()),
            Arc::new(self.store.profile_directory()),
        )
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut admin) = PgConnection::establish(&self.url) {
            let dropped = admin.batch_execute(&format!("DROP SCHEMA {} CASCADE", self.schema));
            if let Err(err) = dropped {
                tracing::warn!(schema = %self.schema, error = %err, "failed to drop test schema");
            }
        }
    }
}

/// Provides a migrated schema, or `None` when no test database is configured.
///
/// # Errors
///
/// Returns an error when a database is configured but cannot be prepared.
#[fixture]
pub async fn database() -> Result<Option<TestDatabase>, BoxError> {
    match std::env::var(TEST_DATABASE_URL) {
        Ok(url) if !url.trim().is_empty() => Ok(Some(TestDatabase::create(url).await?)),
        _ => Ok(None),
    }
}
