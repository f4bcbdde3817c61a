//! Conformance checking
//!
//! Exercises every registered component through a single calling contract.

pub(crate) mod contract;
pub(crate) mod error;
pub(crate) mod harness;

pub mod api;
