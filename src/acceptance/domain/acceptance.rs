//! Acceptance command and outcome.

use crate::chat::domain::ChatId;
use crate::offer::domain::OfferId;
use crate::profile::domain::ProfileId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the store needs to apply an acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOffer {
    /// Offer being accepted.
    pub offer_id: OfferId,
    /// Rendered system message announcing the match.
    pub announcement: String,
    /// Timestamp applied to every row the acceptance touches.
    pub accepted_at: DateTime<Utc>,
}

/// Outcome of a successful acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceptedOffer {
    /// The matched task, now `ACCEPTED`.
    pub task_id: TaskId,
    /// The accepted offer.
    pub offer_id: OfferId,
    /// The provider the task was matched with.
    pub provider_id: ProfileId,
    /// The chat that stays active for the matched parties.
    pub chat_id: ChatId,
}
