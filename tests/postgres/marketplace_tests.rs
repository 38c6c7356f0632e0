//! `PostgreSQL` marketplace flows.

use diesel::connection::SimpleConnection;
use rstest::rstest;
use taskpanda::chat::{domain::MessageKind, services::PostMessageRequest};
use taskpanda::error::{Classify, ErrorKind};
use taskpanda::offer::{domain::OfferStatus, services::UpdateOfferRequest};
use taskpanda::profile::domain::ProfileRole;
use taskpanda::task::{domain::TaskStatus, services::UpdateTaskStatusRequest};

use super::database::{TestDatabase, database};
use crate::test_helpers::BoxError;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_store_answers_pings(
    #[future] database: Result<Option<TestDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(db) = database.await? else {
        return Ok(());
    };
    db.store().ping().await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_offer_acceptance_flow(
    #[future] database: Result<Option<TestDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(db) = database.await? else {
        return Ok(());
    };
    let market = db.marketplace();
    let customer = market
        .register("Alice Customer", "alice@example.com", ProfileRole::Customer)
        .await?;
    let bob = market
        .register("Bob Builder", "bob@example.com", ProfileRole::ServiceProvider)
        .await?;
    let carol = market
        .register("Carol Cleaner", "carol@example.com", ProfileRole::ServiceProvider)
        .await?;
    let task = market.post_task(customer, "Paint fence", "150").await?;

    let winning = market.bid(&task, bob, "140", "Weekend works").await?;
    let losing = market.bid(&task, carol, "120", "").await?;
    let revised = market
        .offers
        .update(UpdateOfferRequest::new(winning.offer.id()).with_price("135.50"))
        .await?;
    assert_eq!(revised.price().cents(), 13_550);
    assert_eq!(market.chats.unread_count(customer).await?, 2);

    let accepted = market.acceptance.accept_offer(winning.offer.id()).await?;
    assert_eq!(accepted.chat_id, winning.chat_id);

    let stored = market.tasks.find(task.id()).await?;
    assert_eq!(stored.status(), TaskStatus::Accepted);
    assert_eq!(stored.accepted_provider(), Some(bob));

    let statuses: Vec<(String, OfferStatus)> = market
        .offers
        .list(task.id())
        .await?
        .into_iter()
        .map(|listing| (listing.provider_name, listing.offer.status()))
        .collect();
    assert_eq!(
        statuses,
        [
            ("Bob Builder".to_owned(), OfferStatus::Accepted),
            ("Carol Cleaner".to_owned(), OfferStatus::Rejected),
        ]
    );

    let messages = market.chats.messages(winning.chat_id).await?;
    let kinds: Vec<MessageKind> = messages.iter().map(|message| message.kind()).collect();
    assert_eq!(kinds, [MessageKind::OfferUpdate, MessageKind::System]);

    let closed = market
        .chats
        .post_message(PostMessageRequest::text(losing.chat_id, carol, "Hello?"))
        .await;
    assert_eq!(closed.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Conflict));

    assert_eq!(market.chats.unread_count(bob).await?, 1);
    assert_eq!(market.chats.mark_read(winning.chat_id, bob).await?, 1);
    assert_eq!(market.chats.unread_count(bob).await?, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_rejects_duplicate_bids_and_emails(
    #[future] database: Result<Option<TestDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(db) = database.await? else {
        return Ok(());
    };
    let market = db.marketplace();
    let customer = market
        .register("Alice Customer", "alice@example.com", ProfileRole::Customer)
        .await?;
    let bob = market
        .register("Bob Builder", "bob@example.com", ProfileRole::ServiceProvider)
        .await?;
    let task = market.post_task(customer, "Fix tap", "60").await?;
    market.bid(&task, bob, "55", "").await?;

    let duplicate_bid = market.bid(&task, bob, "50", "").await;
    let duplicate_email = market
        .register("Other Bob", "BOB@example.com", ProfileRole::ServiceProvider)
        .await;

    assert!(duplicate_bid.is_err());
    assert!(duplicate_email.is_err());
    assert_eq!(market.offers.list(task.id()).await?.len(), 1);
    assert_eq!(market.chats.list_for_user(customer).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_status_updates_keep_the_match(
    #[future] database: Result<Option<TestDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(db) = database.await? else {
        return Ok(());
    };
    let market = db.marketplace();
    let customer = market
        .register("Alice Customer", "alice@example.com", ProfileRole::Customer)
        .await?;
    let bob = market
        .register("Bob Builder", "bob@example.com", ProfileRole::ServiceProvider)
        .await?;
    let task = market.post_task(customer, "Move sofa", "80").await?;
    let placed = market.bid(&task, bob, "75", "").await?;
    market.acceptance.accept_offer(placed.offer.id()).await?;

    let cancelled = market
        .tasks
        .update_status(UpdateTaskStatusRequest::new(task.id(), "CANCELLED"))
        .await?;
    let unknown = market
        .tasks
        .update_status(UpdateTaskStatusRequest::new(task.id(), "PAUSED"))
        .await;

    assert_eq!(cancelled.status(), TaskStatus::Cancelled);
    assert_eq!(cancelled.accepted_provider(), Some(bob));
    assert_eq!(unknown.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Validation));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_failed_acceptance_leaves_rows_unchanged(
    #[future] database: Result<Option<TestDatabase>, BoxError>,
) -> Result<(), BoxError> {
    let Some(db) = database.await? else {
        return Ok(());
    };
    let market = db.marketplace();
    let customer = market
        .register("Alice Customer", "alice@example.com", ProfileRole::Customer)
        .await?;
    let bob = market
        .register("Bob Builder", "bob@example.com", ProfileRole::ServiceProvider)
        .await?;
    let carol = market
        .register("Carol Cleaner", "carol@example.com", ProfileRole::ServiceProvider)
        .await?;
    let task = market.post_task(customer, "Hang shelves", "90").await?;
    let orphaned = market.bid(&task, bob, "85", "").await?;
    let sibling = market.bid(&task, carol, "80", "").await?;
    let chat = orphaned.chat_id.into_inner();
    db.store().pool().get()?.batch_execute(&format!(
        "DELETE FROM chat_messages WHERE chat_id = '{chat}'; DELETE FROM chats WHERE id = '{chat}'"
    ))?;

    let failed = market.acceptance.accept_offer(orphaned.offer.id()).await;

    assert_eq!(failed.map(|_| ()).map_err(|err| err.kind()), Err(ErrorKind::Store));
    let stored = market.tasks.find(task.id()).await?;
    assert_eq!(stored.status(), TaskStatus::Open);
    assert_eq!(stored.accepted_provider(), None);
    let statuses: Vec<OfferStatus> = market
        .offers
        .list(task.id())
        .await?
        .into_iter()
        .map(|listing| listing.offer.status())
        .collect();
    assert_eq!(statuses, [OfferStatus::Pending, OfferStatus::Pending]);
    let chats = market.chats.list_for_user(customer).await?;
    assert_eq!(chats.len(), 1);
    assert!(chats.iter().all(|overview| overview.chat.is_active()));
    let kinds: Vec<MessageKind> = market
        .chats
        .messages(sibling.chat_id)
        .await?
        .iter()
        .map(|message| message.kind())
        .collect();
    assert_eq!(kinds, [MessageKind::OfferUpdate]);
    Ok(())
}
