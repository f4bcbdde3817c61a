//! Public API for conformance checking

pub use crate::conformance::contract::{
    Contract, ContractTemplate, DEFAULT_METHOD, DEFAULT_PARAMETER, DEFAULT_SAMPLE_INPUT,
    DEFAULT_TEMPLATE,
};
pub use crate::conformance::error::{ContractViolation, ViolationCause};
pub use crate::conformance::harness::{verify, ConformanceReport, Harness, HarnessMode};
