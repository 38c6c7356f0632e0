//! Unit tests for the acceptance coordinator.
