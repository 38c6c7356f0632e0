//! Marketplace invariants that span several contexts.

use std::sync::Arc;

use rstest::rstest;
use taskpanda::error::{Classify, ErrorKind};
use taskpanda::offer::domain::OfferStatus;
use taskpanda::profile::domain::{ProfileId, ProfileRole};
use taskpanda::profile::ports::ProfileDirectoryError;
use taskpanda::task::services::UpdateTaskStatusRequest;

use super::helpers::{BoxError, InMemoryMarketplace, cast, market};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_provider_bids_once_per_task(market: InMemoryMarketplace) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    market
        .bid(&cast.task, cast.first_provider, "100", "")
        .await?;

    let again = market
        .offers
        .create(taskpanda::offer::services::CreateOfferRequest {
            task_id: cast.task.id(),
            provider_id: cast.first_provider,
            price: "90".to_owned(),
            message: "Lower price".to_owned(),
        })
        .await;

    assert_eq!(again.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Conflict));
    assert_eq!(market.offers.list(cast.task.id()).await?.len(), 1);
    assert_eq!(market.chats.list_for_user(cast.customer).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn matched_tasks_take_no_new_offers(market: InMemoryMarketplace) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let placed = market
        .bid(&cast.task, cast.first_provider, "100", "")
        .await?;
    market.acceptance.accept_offer(placed.offer.id()).await?;

    let late = market
        .bid(&cast.task, cast.second_provider, "80", "")
        .await;

    assert!(late.is_err());
    assert_eq!(market.offers.list(cast.task.id()).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_tasks_reject_acceptance(market: InMemoryMarketplace) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let placed = market
        .bid(&cast.task, cast.first_provider, "100", "")
        .await?;
    market
        .tasks
        .update_status(UpdateTaskStatusRequest::new(cast.task.id(), "CANCELLED"))
        .await?;

    let result = market.acceptance.accept_offer(placed.offer.id()).await;

    assert_eq!(result.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Conflict));
    let listing = market.offers.list(cast.task.id()).await?;
    assert!(
        listing
            .iter()
            .all(|entry| entry.offer.status() == OfferStatus::Pending)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_acceptances_on_one_task_have_a_single_winner(
    market: InMemoryMarketplace,
) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let mut offer_ids = Vec::new();
    for (index, provider) in [cast.first_provider, cast.second_provider]
        .into_iter()
        .enumerate()
    {
        offer_ids.push(market.bid(&cast.task, provider, "100", "").await?.offer.id());
        let extra = market
            .register(
                &format!("Extra Provider {index}"),
                &format!("extra{index}@example.com"),
                ProfileRole::ServiceProvider,
            )
            .await?;
        offer_ids.push(market.bid(&cast.task, extra, "95", "").await?.offer.id());
    }

    let shared = Arc::new(market);
    let handles: Vec<_> = offer_ids
        .iter()
        .map(|offer_id| {
            let market = Arc::clone(&shared);
            let id = *offer_id;
            tokio::spawn(async move { market.acceptance.accept_offer(id).await })
        })
        .collect();
    let mut winners = Vec::new();
    for handle in handles {
        if let Ok(accepted) = handle.await? {
            winners.push(accepted);
        }
    }

    assert_eq!(winners.len(), 1);
    let winner = winners.first().ok_or("missing winner")?;
    let listing = shared.offers.list(cast.task.id()).await?;
    let accepted: Vec<_> = listing
        .iter()
        .filter(|entry| entry.offer.status() == OfferStatus::Accepted)
        .map(|entry| entry.offer.id())
        .collect();
    assert_eq!(accepted, [winner.offer_id]);
    let active_chats = shared
        .chats
        .list_for_user(cast.customer)
        .await?
        .into_iter()
        .filter(|overview| overview.chat.is_active())
        .count();
    assert_eq!(active_chats, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_need_a_known_creator(market: InMemoryMarketplace) {
    let result = market.post_task(ProfileId::new(), "Mow lawn", "25").await;

    assert!(result.is_err());
    assert!(matches!(market.tasks.list(None).await.as_deref(), Ok([])));
}

#[rstest]
#[case("completed")]
#[case(" OPEN ")]
#[case("Cancelled")]
#[tokio::test(flavor = "multi_thread")]
async fn status_literals_must_match_exactly(
    market: InMemoryMarketplace,
    #[case] raw: &str,
) -> Result<(), BoxError> {
    let cast = cast(&market).await?;

    let result = market
        .tasks
        .update_status(UpdateTaskStatusRequest::new(cast.task.id(), raw))
        .await;

    assert_eq!(result.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Validation));
    let stored = market.tasks.find(cast.task.id()).await?;
    assert_eq!(stored.status(), taskpanda::task::domain::TaskStatus::Open);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn emails_are_unique_ignoring_case(market: InMemoryMarketplace) -> Result<(), BoxError> {
    market
        .register("Bob Builder", "bob@example.com", ProfileRole::ServiceProvider)
        .await?;

    let shouted = market
        .register("Other Bob", "  BOB@Example.COM ", ProfileRole::Customer)
        .await;

    let err = shouted.expect_err("case variant of a known email should collide");
    assert!(matches!(
        err.downcast_ref::<ProfileDirectoryError>(),
        Some(ProfileDirectoryError::DuplicateEmail(email)) if email == "bob@example.com"
    ));
    Ok(())
}
