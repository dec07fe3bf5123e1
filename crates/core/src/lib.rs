//! # Flagstore Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for flag storage and the audit trail (traits)
//! - Per-operation payload schemas
//! - The toggle use case and the remaining flag operations
//! - The caller-facing [`FlagControlPlane`] returning [`Outcome`] values
//!
//! ## Architecture Principles
//! - Only depends on `flagstore-common` and `flagstore-domain`
//! - No database or platform code
//! - All storage access via traits

pub mod control_plane;
pub mod flags;
pub mod outcome;

pub use control_plane::FlagControlPlane;
pub use flags::ports::{AuditWriter, FlagRepository};
pub use flags::service::FlagService;
pub use flags::toggle::{ToggleReceipt, ToggleService};
pub use outcome::{Outcome, OutcomeStatus};
