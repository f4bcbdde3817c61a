//! Core services and infrastructure

pub mod error_handling;
pub mod logging;
pub mod styles; // shared palette for CLI output and tables
pub mod validation;
pub mod version;
