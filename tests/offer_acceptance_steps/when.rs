//! When steps for offer acceptance BDD scenarios.

use super::world::{OfferAcceptanceWorld, run_async};
use rstest_bdd_macros::when;
use taskpanda::offer::services::CreateOfferRequest;

#[when(r#"the customer accepts the offer from "{name}""#)]
fn customer_accepts(world: &mut OfferAcceptanceWorld, name: String) -> Result<(), eyre::Report> {
    let offer_id = world.bidder(&name)?.placed.offer.id();
    let result = run_async(world.market.acceptance.accept_offer(offer_id));
    world.last_acceptance = Some(result);
    Ok(())
}

#[when(r#"provider "{name}" tries to offer "{price}""#)]
fn provider_tries_to_offer(
    world: &mut OfferAcceptanceWorld,
    name: String,
    price: String,
) -> Result<(), eyre::Report> {
    let provider_id = world.register_provider(&name)?;
    let task_id = world.task()?.id();
    let result = run_async(world.market.offers.create(CreateOfferRequest {
        task_id,
        provider_id,
        price,
        message: String::new(),
    }));
    world.last_offer = Some(result);
    Ok(())
}
