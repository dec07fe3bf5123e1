//! Database implementations

pub mod audit_repository;
pub mod filter_query;
pub mod flag_repository;
pub mod manager;
pub mod seed;

pub use audit_repository::*;
pub use filter_query::*;
pub use flag_repository::*;
pub use manager::*;
pub use seed::*;
