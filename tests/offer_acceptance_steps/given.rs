//! Given steps for offer acceptance BDD scenarios.

use super::world::{Bidder, OfferAcceptanceWorld, run_async};
use rstest_bdd_macros::given;
use taskpanda::profile::domain::ProfileRole;

#[given(r#"a customer "{name}" with an open task "{title}""#)]
fn customer_with_open_task(
    world: &mut OfferAcceptanceWorld,
    name: String,
    title: String,
) -> Result<(), eyre::Report> {
    let customer = run_async(world.market.register(
        &name,
        &format!("{}@example.com", name.to_ascii_lowercase()),
        ProfileRole::Customer,
    ))
    .map_err(eyre::Report::msg)?;
    let task = run_async(world.market.post_task(customer, &title, "150.00"))
        .map_err(eyre::Report::msg)?;
    world.customer = Some(customer);
    world.task = Some(task);
    Ok(())
}

#[given(r#"provider "{name}" offers "{price}""#)]
fn provider_offers(
    world: &mut OfferAcceptanceWorld,
    name: String,
    price: String,
) -> Result<(), eyre::Report> {
    let profile_id = world.register_provider(&name)?;
    let task = world.task()?;
    let placed = run_async(world.market.bid(task, profile_id, &price, ""))
        .map_err(eyre::Report::msg)?;
    world.bidders.insert(name, Bidder { profile_id, placed });
    Ok(())
}
