//! Shared world state for offer acceptance BDD scenarios.

use std::collections::HashMap;

use rstest::fixture;
use taskpanda::acceptance::{domain::AcceptedOffer, services::AcceptanceError};
use taskpanda::offer::services::{OfferServiceError, PlacedOffer};
use taskpanda::profile::domain::{ProfileId, ProfileRole};
use taskpanda::task::domain::Task;

use crate::test_helpers::InMemoryMarketplace;

/// A provider taking part in a scenario.
pub struct Bidder {
    pub profile_id: ProfileId,
    pub placed: PlacedOffer,
}

/// Scenario world for offer acceptance behaviour tests.
pub struct OfferAcceptanceWorld {
    pub market: InMemoryMarketplace,
    pub customer: Option<ProfileId>,
    pub task: Option<Task>,
    pub bidders: HashMap<String, Bidder>,
    pub last_acceptance: Option<Result<AcceptedOffer, AcceptanceError>>,
    pub last_offer: Option<Result<PlacedOffer, OfferServiceError>>,
}

impl OfferAcceptanceWorld {
    /// Creates a world over an empty marketplace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            market: InMemoryMarketplace::in_memory(),
            customer: None,
            task: None,
            bidders: HashMap::new(),
            last_acceptance: None,
            last_offer: None,
        }
    }

    /// Returns the scenario's task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the named bidder.
    pub fn bidder(&self, name: &str) -> Result<&Bidder, eyre::Report> {
        self.bidders
            .get(name)
            .ok_or_else(|| eyre::eyre!("no offer from {name} in scenario world"))
    }

    /// Registers a provider named `name`.
    pub fn register_provider(&self, name: &str) -> Result<ProfileId, eyre::Report> {
        run_async(self.market.register(
            name,
            &format!("{}@example.com", name.to_ascii_lowercase()),
            ProfileRole::ServiceProvider,
        ))
        .map_err(eyre::Report::msg)
    }
}

impl Default for OfferAcceptanceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OfferAcceptanceWorld {
    OfferAcceptanceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
