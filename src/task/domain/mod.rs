//! Domain model for the task store.
//!
//! Tasks carry validated posting details, the customer who created them,
//! and a lifecycle status. Infrastructure concerns stay outside the domain
//! boundary.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::{ParseTransitionPolicyError, TaskStatus, TransitionPolicy};
pub use task::{PersistedTaskData, Task, TaskDetails};
