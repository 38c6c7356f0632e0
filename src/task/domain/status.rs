//! Task lifecycle status and transition policy.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Soliciting offers.
    Open,
    /// An offer has been accepted.
    Accepted,
    /// The matched provider is working on the task.
    InProgress,
    /// The work is finished.
    Completed,
    /// The task was withdrawn.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Accepted => "ACCEPTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns `true` for states that allow no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` for states that follow a successful match.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Accepted | Self::InProgress | Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "OPEN" => Ok(Self::Open),
            "ACCEPTED" => Ok(Self::Accepted),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Rules applied to explicit status updates.
///
/// Acceptance is never an explicit update under [`TransitionPolicy::Strict`];
/// it belongs to the acceptance coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any recognised status may be written over any other.
    #[default]
    Permissive,
    /// Only moves along the lifecycle graph are allowed.
    Strict,
}

impl TransitionPolicy {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }

    /// Returns whether an explicit update from `from` to `to` is allowed.
    #[must_use]
    pub const fn permits(self, from: TaskStatus, to: TaskStatus) -> bool {
        match self {
            Self::Permissive => true,
            Self::Strict => matches!(
                (from, to),
                (TaskStatus::Open, TaskStatus::Cancelled)
                    | (TaskStatus::Accepted, TaskStatus::InProgress | TaskStatus::Cancelled)
                    | (
                        TaskStatus::InProgress,
                        TaskStatus::Completed | TaskStatus::Cancelled
                    )
            ),
        }
    }
}

impl TryFrom<&str> for TransitionPolicy {
    type Error = ParseTransitionPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            _ => Err(ParseTransitionPolicyError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a transition policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transition policy '{0}', expected permissive or strict")]
pub struct ParseTransitionPolicyError(pub String);
