//! End-to-end marketplace flows over the in-memory store.

use rstest::rstest;
use taskpanda::chat::{domain::MessageKind, services::PostMessageRequest};
use taskpanda::error::{Classify, ErrorKind};
use taskpanda::offer::domain::OfferStatus;
use taskpanda::offer::services::UpdateOfferRequest;
use taskpanda::task::domain::TaskStatus;
use taskpanda::task::services::UpdateTaskStatusRequest;

use super::helpers::{BoxError, InMemoryMarketplace, cast, market};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn two_providers_bid_and_one_is_accepted(
    market: InMemoryMarketplace,
) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let bob = market
        .bid(&cast.task, cast.first_provider, "140", "Can start early")
        .await?;
    let carol = market
        .bid(&cast.task, cast.second_provider, "120", "")
        .await?;

    let listings = market.offers.list(cast.task.id()).await?;
    let names: Vec<&str> = listings
        .iter()
        .map(|listing| listing.provider_name.as_str())
        .collect();
    assert_eq!(names, ["Bob Builder", "Carol Cleaner"]);

    let opening = market.chats.messages(bob.chat_id).await?;
    assert_eq!(opening.len(), 1);
    let first = opening.first().ok_or("missing opening message")?;
    assert_eq!(
        first.body(),
        "I'm interested in this task. My offer: 140.00. Can start early"
    );
    assert_eq!(first.kind(), MessageKind::OfferUpdate);
    assert_eq!(market.chats.unread_count(cast.customer).await?, 2);

    let accepted = market.acceptance.accept_offer(bob.offer.id()).await?;
    assert_eq!(accepted.chat_id, bob.chat_id);
    assert_eq!(accepted.provider_id, cast.first_provider);

    let task = market.tasks.find(cast.task.id()).await?;
    assert_eq!(task.status(), TaskStatus::Accepted);
    assert_eq!(task.accepted_provider(), Some(cast.first_provider));

    let statuses: Vec<OfferStatus> = market
        .offers
        .list(cast.task.id())
        .await?
        .iter()
        .map(|listing| listing.offer.status())
        .collect();
    assert_eq!(statuses, [OfferStatus::Accepted, OfferStatus::Rejected]);

    let overviews = market.chats.list_for_user(cast.customer).await?;
    let active: Vec<_> = overviews
        .iter()
        .filter(|overview| overview.chat.is_active())
        .map(|overview| overview.chat.id())
        .collect();
    assert_eq!(active, [bob.chat_id]);

    let announcement = market.chats.messages(bob.chat_id).await?;
    let system = announcement.last().ok_or("missing system message")?;
    assert_eq!(system.kind(), MessageKind::System);
    assert_eq!(
        system.body(),
        "Bob Builder's offer for \"End of tenancy clean\" has been accepted. \
         Use this chat to arrange the work."
    );

    let closed = market
        .chats
        .post_message(PostMessageRequest::text(
            carol.chat_id,
            cast.second_provider,
            "Still available?",
        ))
        .await;
    assert_eq!(closed.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Conflict));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn matched_parties_keep_talking_after_acceptance(
    market: InMemoryMarketplace,
) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let placed = market
        .bid(&cast.task, cast.first_provider, "99.50", "")
        .await?;
    market.acceptance.accept_offer(placed.offer.id()).await?;

    market
        .chats
        .post_message(PostMessageRequest::text(
            placed.chat_id,
            cast.customer,
            "Great, see you Friday",
        ))
        .await?;
    let unread_before = market.chats.unread_count(cast.first_provider).await?;
    let marked = market
        .chats
        .mark_read(placed.chat_id, cast.first_provider)
        .await?;

    assert_eq!(unread_before, 2);
    assert_eq!(marked, 2);
    assert_eq!(market.chats.unread_count(cast.first_provider).await?, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revisions_apply_until_the_offer_is_resolved(
    market: InMemoryMarketplace,
) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let placed = market
        .bid(&cast.task, cast.first_provider, "140", "")
        .await?;

    let revised = market
        .offers
        .update(UpdateOfferRequest::new(placed.offer.id()).with_price("130"))
        .await?;
    assert_eq!(revised.price().to_string(), "130.00");

    market.acceptance.accept_offer(placed.offer.id()).await?;
    let after = market
        .offers
        .update(UpdateOfferRequest::new(placed.offer.id()).with_message("Bringing ladders"))
        .await;
    assert_eq!(after.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Conflict));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_updates_follow_acceptance(market: InMemoryMarketplace) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let placed = market
        .bid(&cast.task, cast.second_provider, "110", "")
        .await?;
    market.acceptance.accept_offer(placed.offer.id()).await?;

    let in_progress = market
        .tasks
        .update_status(UpdateTaskStatusRequest::new(cast.task.id(), "IN_PROGRESS"))
        .await?;
    let completed = market
        .tasks
        .update_status(UpdateTaskStatusRequest::new(cast.task.id(), "COMPLETED"))
        .await?;

    assert_eq!(in_progress.status(), TaskStatus::InProgress);
    assert_eq!(completed.status(), TaskStatus::Completed);
    assert_eq!(completed.accepted_provider(), Some(cast.second_provider));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customers_only_see_their_own_tasks(market: InMemoryMarketplace) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let other = market
        .register("Dan Customer", "dan@example.com", taskpanda::profile::domain::ProfileRole::Customer)
        .await?;
    let dans = market.post_task(other, "Hang shelves", "40").await?;

    let alice_tasks = market.tasks.list(Some(cast.customer)).await?;
    let everything = market.tasks.list(None).await?;

    assert_eq!(
        alice_tasks.iter().map(|task| task.id()).collect::<Vec<_>>(),
        [cast.task.id()]
    );
    assert_eq!(
        everything.iter().map(|task| task.id()).collect::<Vec<_>>(),
        [dans.id(), cast.task.id()]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fractional_amounts_round_to_whole_cents(
    market: InMemoryMarketplace,
) -> Result<(), BoxError> {
    let cast = cast(&market).await?;
    let task = market
        .post_task(cast.customer, "Trim hedge", "12.345")
        .await?;
    let placed = market
        .bid(&task, cast.first_provider, "70.505", "hi")
        .await?;

    assert_eq!(task.details().budget().cents(), 1_235);
    assert_eq!(placed.offer.price().cents(), 7_051);
    let opening = market.chats.messages(placed.chat_id).await?;
    assert_eq!(
        opening.first().map(|message| message.body()),
        Some("I'm interested in this task. My offer: 70.51. hi")
    );
    Ok(())
}
