//! Adapter implementations for the notification sink port.

mod log;

pub use log::LoggingNotificationSink;
