//! Then steps for offer acceptance BDD scenarios.

use super::world::{OfferAcceptanceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskpanda::chat::domain::MessageKind;
use taskpanda::error::{Classify, ErrorKind};
use taskpanda::offer::domain::OfferStatus;
use taskpanda::task::domain::TaskStatus;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &OfferAcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = run_async(world.market.tasks.find(world.task()?.id())).wrap_err("load task")?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the offer from "{name}" is "{status}""#)]
fn offer_status_is(
    world: &OfferAcceptanceWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = OfferStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let offer_id = world.bidder(&name)?.placed.offer.id();
    let listing =
        run_async(world.market.offers.list(world.task()?.id())).wrap_err("list offers")?;
    let offer = listing
        .iter()
        .find(|entry| entry.offer.id() == offer_id)
        .ok_or_else(|| eyre::eyre!("offer from {name} missing from listing"))?;
    eyre::ensure!(
        offer.offer.status() == expected,
        "expected {name}'s offer to be {expected}, found {}",
        offer.offer.status()
    );
    Ok(())
}

#[then(r#"only the chat with "{name}" is active"#)]
fn only_chat_is_active(world: &OfferAcceptanceWorld, name: String) -> Result<(), eyre::Report> {
    let customer = world
        .customer
        .ok_or_else(|| eyre::eyre!("missing customer in scenario world"))?;
    let expected = world.bidder(&name)?.placed.chat_id;
    let active: Vec<_> = run_async(world.market.chats.list_for_user(customer))
        .wrap_err("list chats")?
        .into_iter()
        .filter(|overview| overview.chat.is_active())
        .map(|overview| overview.chat.id())
        .collect();
    eyre::ensure!(active == [expected], "expected only {name}'s chat active, found {active:?}");
    Ok(())
}

#[then(r#"the chat with "{name}" ends with a system message"#)]
fn chat_ends_with_system_message(
    world: &OfferAcceptanceWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let chat_id = world.bidder(&name)?.placed.chat_id;
    let messages = run_async(world.market.chats.messages(chat_id)).wrap_err("load messages")?;
    let last = messages
        .last()
        .ok_or_else(|| eyre::eyre!("chat with {name} has no messages"))?;
    eyre::ensure!(
        last.kind() == MessageKind::System,
        "expected a system message, found {:?}",
        last.kind()
    );
    Ok(())
}

#[then("the last acceptance fails with a conflict")]
fn acceptance_conflicts(world: &OfferAcceptanceWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_acceptance
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing acceptance result"))?;
    match result {
        Err(err) if err.kind() == ErrorKind::Conflict => Ok(()),
        other => Err(eyre::eyre!("expected a conflict, got {other:?}")),
    }
}

#[then("the last offer fails with a conflict")]
fn offer_conflicts(world: &OfferAcceptanceWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_offer
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing offer result"))?;
    match result {
        Err(err) if err.kind() == ErrorKind::Conflict => Ok(()),
        other => Err(eyre::eyre!("expected a conflict, got {other:?}")),
    }
}
