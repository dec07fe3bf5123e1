//! Observability infrastructure
//!
//! Components emit events through `tracing`; this module installs the
//! subscriber that decides where they go.

pub mod logging;

pub use logging::{build_env_filter, init_tracing};
