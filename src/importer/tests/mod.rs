//! Test modules for the import pipeline
//!
//! Unit-level suites covering classification, isolation between units and
//! the registry's ordering and failure policies.

mod isolation;
mod utils;
