//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use crate::money::MoneyError;
use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A required text field is empty after trimming.
    #[error("task {0} must not be empty")]
    EmptyField(&'static str),

    /// The budget is not a positive amount.
    #[error("invalid budget: {0}")]
    InvalidBudget(#[from] MoneyError),

    /// The date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid task date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The task no longer accepts offers.
    #[error("task {task_id} is not accepting offers (status {status})")]
    NotOpen {
        /// The task being acted on.
        task_id: TaskId,
        /// Its current status.
        status: TaskStatus,
    },

    /// The transition policy forbids the requested status change.
    #[error("cannot move task from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
