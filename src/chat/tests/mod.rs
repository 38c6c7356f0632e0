//! Unit tests for the chat fabric.
