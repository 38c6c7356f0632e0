//! `PostgreSQL` connection pool, lifecycle, and blocking helpers.
//!
//! Diesel is synchronous, so every adapter hands its closure to
//! [`run_blocking_with`] to keep the async executor free.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use thiserror::Error;

use crate::acceptance::adapters::postgres::PostgresAcceptanceRepository;
use crate::chat::adapters::postgres::PostgresChatRepository;
use crate::config::StoreConfig;
use crate::offer::adapters::postgres::PostgresOfferRepository;
use crate::profile::adapters::postgres::PostgresProfileDirectory;
use crate::task::adapters::postgres::PostgresTaskRepository;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Schema migration applied by [`PostgresStore::migrate`].
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_marketplace_tables/up.sql");

/// Errors raised while opening or preparing the store.
#[derive(Debug, Error)]
pub enum StoreOpenError {
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// A pooled connection could not run the requested statement.
    #[error("failed to prepare store: {0}")]
    Query(#[from] diesel::result::Error),

    /// The blocking worker thread failed.
    #[error("store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Explicitly opened `PostgreSQL` store handle.
///
/// Constructed once at startup and passed into adapters; dropping or calling
/// [`PostgresStore::close`] releases every pooled connection.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Opens a pool for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreOpenError::Pool`] when no connection can be established
    /// within the configured timeout.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreOpenError> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url());
        let pool = Pool::builder()
            .max_size(config.max_connections())
            .connection_timeout(config.connect_timeout())
            .build(manager)?;
        tracing::info!(
            max_connections = config.max_connections(),
            "opened PostgreSQL store"
        );
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the marketplace schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreOpenError`] when a connection cannot be obtained or the
    /// schema statements fail.
    pub async fn migrate(&self) -> Result<(), StoreOpenError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            connection.batch_execute(CREATE_SCHEMA_SQL)?;
            Ok::<(), StoreOpenError>(())
        })
        .await??;
        tracing::info!("applied marketplace schema");
        Ok(())
    }

    /// Verifies that a connection can run a trivial statement.
    ///
    /// # Errors
    ///
    /// Returns [`StoreOpenError`] when the database is unreachable.
    pub async fn ping(&self) -> Result<(), StoreOpenError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            connection.batch_execute("SELECT 1")?;
            Ok::<(), StoreOpenError>(())
        })
        .await?
    }

    /// Returns a task repository backed by this store.
    #[must_use]
    pub fn task_repository(&self) -> PostgresTaskRepository {
        PostgresTaskRepository::new(self.pool.clone())
    }

    /// Returns an offer repository backed by this store.
    #[must_use]
    pub fn offer_repository(&self) -> PostgresOfferRepository {
        PostgresOfferRepository::new(self.pool.clone())
    }

    /// Returns a chat repository backed by this store.
    #[must_use]
    pub fn chat_repository(&self) -> PostgresChatRepository {
        PostgresChatRepository::new(self.pool.clone())
    }

    /// Returns an acceptance repository backed by this store.
    #[must_use]
    pub fn acceptance_repository(&self) -> PostgresAcceptanceRepository {
        PostgresAcceptanceRepository::new(self.pool.clone())
    }

    /// Returns a profile directory backed by this store.
    #[must_use]
    pub fn profile_directory(&self) -> PostgresProfileDirectory {
        PostgresProfileDirectory::new(self.pool.clone())
    }

    /// Closes the store, releasing pooled connections once every adapter
    /// clone has been dropped.
    pub fn close(self) {
        let state = self.pool.state();
        tracing::info!(
            connections = state.connections,
            idle = state.idle_connections,
            "closing PostgreSQL store"
        );
        drop(self.pool);
    }
}

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}

/// Returns the constraint name of a unique violation, if `err` is one.
///
/// Violations reported without a constraint name yield an empty string.
pub(crate) fn unique_violation(err: &diesel::result::Error) -> Option<String> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default().to_owned())
        }
        _ => None,
    }
}
