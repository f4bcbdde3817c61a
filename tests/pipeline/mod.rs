//! Pipeline integration test modules

pub mod configuration;
pub mod conformance;
pub mod isolation;
pub mod registration;
