//! Storage infrastructure shared across bounded contexts.
//!
//! - [`memory`]: one lock-guarded table set used by every in-memory adapter
//! - [`postgres`]: pool lifecycle, migrations, and blocking helpers
//! - [`schema`]: Diesel table definitions

pub mod memory;
pub mod postgres;
pub mod schema;

pub use memory::{InMemoryStore, MemoryTables, PoisonedStore};
pub use postgres::{PgPool, PostgresStore, StoreOpenError};
