//! Fixtures for in-memory marketplace integration tests.

use rstest::fixture;
use taskpanda::profile::domain::{ProfileId, ProfileRole};
use taskpanda::task::domain::Task;

pub use crate::test_helpers::{BoxError, InMemoryMarketplace};

/// Provides a marketplace over a fresh in-memory store.
#[fixture]
pub fn market() -> InMemoryMarketplace {
    InMemoryMarketplace::in_memory()
}

/// One customer, two providers, and an open task.
pub struct Cast {
    pub customer: ProfileId,
    pub first_provider: ProfileId,
    pub second_provider: ProfileId,
    pub task: Task,
}

/// Registers the cast and posts the customer's task.
///
/// # Errors
///
/// Returns an error if any registration or task creation fails.
pub async fn cast(market: &InMemoryMarketplace) -> Result<Cast, BoxError> {
    let customer = market
        .register("Alice Customer", "alice@example.com", ProfileRole::Customer)
        .await?;
    let first_provider = market
        .register("Bob Builder", "bob@example.com", ProfileRole::ServiceProvider)
        .await?;
    let second_provider = market
        .register("Carol Cleaner", "carol@example.com", ProfileRole::ServiceProvider)
        .await?;
    let task = market
        .post_task(customer, "End of tenancy clean", "150.00")
        .await?;
    Ok(Cast {
        customer,
        first_provider,
        second_provider,
        task,
    })
}
