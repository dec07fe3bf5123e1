//! Shared test helpers for `flagstore-core` integration tests.

pub mod repositories;
