//! Flag store use cases

pub mod ports;
pub mod schemas;
pub mod service;
pub mod toggle;
