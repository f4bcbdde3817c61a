//! Conformance Violations

use crate::importer::api::{Component, ComponentKind};
use serde::Serialize;
use std::path::PathBuf;

/// Why a component failed the calling contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum ViolationCause {
    #[error("construction failed: {message}")]
    Construction { message: String },

    #[error("declared parameters {found:?} do not accept '{expected}'")]
    Signature { expected: String, found: Vec<Vec<String>> },

    #[error("no operation named '{operation}'")]
    MissingOperation { operation: String },

    #[error("invocation failed: {message}")]
    Invocation { message: String },

    #[error("returned {type_name} instead of a string")]
    NotAString { type_name: String },

    #[error("expected '{expected}' but got '{actual}'")]
    Mismatch { expected: String, actual: String },
}

/// A component that does not honour the calling contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} component '{declaration}' from unit '{unit_name}': {cause}")]
pub struct ContractViolation {
    pub unit_name: String,
    pub unit_path: PathBuf,
    pub declaration: String,
    pub kind: ComponentKind,
    #[source]
    pub cause: ViolationCause,
}

impl ContractViolation {
    pub fn new(component: &Component, cause: ViolationCause) -> Self {
        Self {
            unit_name: component.unit_name().to_string(),
            unit_path: component.unit_path().to_path_buf(),
            declaration: component.declaration().to_string(),
            kind: component.kind(),
            cause,
        }
    }
}
