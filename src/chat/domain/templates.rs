//! Generated message texts.

use super::ChatDomainError;
use crate::money::Money;
use minijinja::{Environment, context};

const OFFER_INTEREST: &str = "I'm interested in this task. My offer: {{ price }}\
{% if note %}. {{ note }}{% endif %}";

const MATCH_ANNOUNCEMENT: &str = "{{ provider_name }}'s offer for \"{{ task_title }}\" \
has been accepted. Use this chat to arrange the work.";

/// Renders the opening message a provider sends with a new offer.
///
/// # Errors
///
/// Returns [`ChatDomainError::TemplateRender`] when rendering fails.
pub fn render_offer_interest(price: Money, note: &str) -> Result<String, ChatDomainError> {
    render(
        "offer_interest",
        OFFER_INTEREST,
        context! { price => price.to_string(), note => note.trim() },
    )
}

/// Renders the system message posted to the accepted offer's chat.
///
/// # Errors
///
/// Returns [`ChatDomainError::TemplateRender`] when rendering fails.
pub fn render_match_announcement(
    task_title: &str,
    provider_name: &str,
) -> Result<String, ChatDomainError> {
    render(
        "match_announcement",
        MATCH_ANNOUNCEMENT,
        context! { task_title => task_title, provider_name => provider_name },
    )
}

fn render(
    template: &'static str,
    source: &str,
    ctx: minijinja::Value,
) -> Result<String, ChatDomainError> {
    Environment::new()
        .render_str(source, ctx)
        .map_err(|error| ChatDomainError::TemplateRender {
            template,
            reason: error.to_string(),
        })
}
