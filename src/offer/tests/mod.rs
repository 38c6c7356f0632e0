//! Unit tests for the offer engine.
