//! `PostgreSQL` acceptance under concurrent callers.

use std::sync::Arc;

use rstest::rstest;
use taskpanda::offer::domain::OfferStatus;
use taskpanda::profile::domain::ProfileRole;

use super::database::{TestDatabase, database};
use crate::test_helpers::BoxError;

const BIDDERS: usize = 5;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_concurrent_acceptances_have_one_winner(
    #[future] database: Result<Option<TestDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(db) = database.await? else {
        return Ok(());
    };
    let market = Arc::new(db.marketplace());
    let customer = market
        .register("Alice Customer", "alice@example.com", ProfileRole::Customer)
        .await?;
    let task = market.post_task(customer, "Garden tidy", "200").await?;
    let mut offer_ids = Vec::with_capacity(BIDDERS);
    for index in 0..BIDDERS {
        let provider = market
            .register(
                &format!("Provider {index}"),
                &format!("provider{index}@example.com"),
                ProfileRole::ServiceProvider,
            )
            .await?;
        offer_ids.push(market.bid(&task, provider, "150", "").await?.offer.id());
    }

    let handles: Vec<_> = offer_ids
        .into_iter()
        .map(|offer_id| {
            let shared = Arc::clone(&market);
            tokio::spawn(async move { shared.acceptance.accept_offer(offer_id).await })
        })
        .collect();
    let mut winners = 0_usize;
    for handle in handles {
        if handle.await?.is_ok() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    let accepted = market
        .offers
        .list(task.id())
        .await?
        .iter()
        .filter(|listing| listing.offer.status() == OfferStatus::Accepted)
        .count();
    assert_eq!(accepted, 1);
    let active = market
        .chats
        .list_for_user(customer)
        .await?
        .iter()
        .filter(|overview| overview.chat.is_active())
        .count();
    assert_eq!(active, 1);
    Ok(())
}
