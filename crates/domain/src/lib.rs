//! # Flagstore Domain
//!
//! Business domain types and models for the flag store.
//!
//! This crate contains:
//! - Flag and audit data types
//! - Request payload shapes for each flag operation
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Millisecond timestamp helpers
//!
//! ## Architecture
//! - No dependencies on other flagstore crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::now_millis;
