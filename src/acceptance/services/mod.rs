//! Application service coordinating offer acceptance.

mod coordinator;

pub use coordinator::{AcceptanceCoordinator, AcceptanceError, AcceptanceResult};
