//! Port contracts for notification side effects.

pub mod sink;

pub use sink::{NotificationError, NotificationResult, NotificationSink};
