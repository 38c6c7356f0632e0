//! Prepares or checks the marketplace `PostgreSQL` store.
//!
//! Usage:
//!
//! ```text
//! taskpanda-db <operation>
//! ```
//!
//! The `operation` must be `migrate` or `check`. Connection settings are read
//! from the environment (see [`taskpanda::config`]); a `.env` file in the
//! working directory is loaded first when present.

use taskpanda::config::{ConfigError, MarketplaceConfig};
use taskpanda::store::{PostgresStore, StoreOpenError};
use thiserror::Error;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum CommandError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreOpenError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Migrate,
    Check,
}

impl Operation {
    fn parse(arg: &str) -> Result<Self, CommandError> {
        match arg {
            "migrate" => Ok(Self::Migrate),
            "check" => Ok(Self::Check),
            other => Err(CommandError::InvalidArgs(format!(
                "unknown operation '{other}'; expected migrate or check"
            ))),
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Operation, CommandError> {
    let _program = args.next();
    let operation = args
        .next()
        .ok_or_else(|| CommandError::InvalidArgs("missing operation argument".into()))
        .and_then(|arg| Operation::parse(&arg))?;
    if let Some(extra) = args.next() {
        return Err(CommandError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok(operation)
}

async fn run(operation: Operation) -> Result<(), CommandError> {
    let config = MarketplaceConfig::from_env()?;
    let store = PostgresStore::open(&config.store)?;
    let outcome = match operation {
        Operation::Migrate => store.migrate().await,
        Operation::Check => store.ping().await,
    };
    store.close();
    outcome?;
    tracing::info!(?operation, "store operation finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    taskpanda::telemetry::init();
    let operation = parse_args(std::env::args())?;
    run(operation).await.map_err(|err| {
        tracing::error!(error = %err, "store operation failed");
        err.into()
    })
}
