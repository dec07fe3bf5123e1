//! Domain data types

pub mod audit;
pub mod flag;
pub mod requests;

pub use audit::*;
pub use flag::*;
pub use requests::*;
