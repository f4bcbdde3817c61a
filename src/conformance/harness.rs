//! Conformance Harness
//!
//! Invokes every registered component through one calling contract and checks
//! the result against the canonical template. TYPE components are constructed
//! with no arguments first and the contract operation is called on the
//! instance; CALLABLE components are called directly.

use crate::conformance::contract::Contract;
use crate::conformance::error::{ContractViolation, ViolationCause};
use crate::importer::api::{Component, ComponentHandle, ComponentKind};
use rhai::Dynamic;
use serde::Serialize;

/// Whether the harness stops at the first violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarnessMode {
    /// Check every component and report all violations
    #[default]
    CollectAll,
    /// Stop at the first violation
    FailFast,
}

/// Outcome of a conformance pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConformanceReport {
    /// Components invoked (includes the failing one when stopping early)
    pub checked: usize,
    pub passed: usize,
    pub violations: Vec<ContractViolation>,
}

impl ConformanceReport {
    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }

    /// First violation, if any
    pub fn first_violation(&self) -> Option<&ContractViolation> {
        self.violations.first()
    }
}

/// Runs the calling contract over a set of components
#[derive(Debug, Clone, Default)]
pub struct Harness {
    contract: Contract,
    mode: HarnessMode,
}

impl Harness {
    pub fn new(contract: Contract, mode: HarnessMode) -> Self {
        Self { contract, mode }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Check every component against the contract using `sample_input`
    pub fn verify<'a>(
        &self,
        components: impl IntoIterator<Item = &'a Component>,
        sample_input: &str,
    ) -> ConformanceReport {
        let mut report = ConformanceReport::default();

        for component in components {
            report.checked += 1;
            match self.check(component, sample_input) {
                Ok(()) => {
                    log::debug!(
                        "{} '{}' from '{}' conforms",
                        component.kind(),
                        component.declaration(),
                        component.unit_name()
                    );
                    report.passed += 1;
                }
                Err(cause) => {
                    let violation = ContractViolation::new(component, cause);
                    log::warn!("{}", violation);
                    report.violations.push(violation);
                    if self.mode == HarnessMode::FailFast {
                        break;
                    }
                }
            }
        }

        report
    }

    /// Invoke one component and compare its result with the canonical value
    pub fn check(&self, component: &Component, sample_input: &str) -> Result<(), ViolationCause> {
        let result = match component.kind() {
            ComponentKind::Type => self.invoke_type(component, sample_input)?,
            ComponentKind::Callable => self.invoke_callable(component, sample_input)?,
        };

        let type_name = result.type_name().to_string();
        let actual = result
            .into_string()
            .map_err(|_| ViolationCause::NotAString { type_name })?;

        let expected = self
            .contract
            .template
            .render(sample_input, component.unit_name());
        if actual != expected {
            return Err(ViolationCause::Mismatch { expected, actual });
        }
        Ok(())
    }

    fn invoke_type(&self, component: &Component, input: &str) -> Result<Dynamic, ViolationCause> {
        let operation = &self.contract.method;
        let mut instance = component
            .construct()
            .map_err(|e| ViolationCause::Construction {
                message: e.to_string(),
            })?;

        if let ComponentHandle::Blueprint { blueprint, .. } = component.handle() {
            if blueprint.method(operation).is_none() {
                return Err(ViolationCause::MissingOperation {
                    operation: operation.clone(),
                });
            }
        }
        self.check_signature(component, operation)?;

        instance
            .call(operation, vec![Dynamic::from(input.to_string())])
            .map_err(|e| ViolationCause::Invocation {
                message: e.to_string(),
            })
    }

    fn invoke_callable(
        &self,
        component: &Component,
        input: &str,
    ) -> Result<Dynamic, ViolationCause> {
        self.check_signature(component, &self.contract.method)?;

        component
            .call(vec![Dynamic::from(input.to_string())])
            .map_err(|e| ViolationCause::Invocation {
                message: e.to_string(),
            })
    }

    /// The contract passes its argument by name; some overload must declare exactly that parameter
    fn check_signature(&self, component: &Component, operation: &str) -> Result<(), ViolationCause> {
        let Some(lists) = component.parameter_lists(operation) else {
            // Native function pointers carry no parameter names
            return Ok(());
        };

        let expected = std::slice::from_ref(&self.contract.parameter);
        if lists.iter().any(|params| params.as_slice() == expected) {
            Ok(())
        } else {
            Err(ViolationCause::Signature {
                expected: self.contract.parameter.clone(),
                found: lists,
            })
        }
    }
}

/// Check components with the default contract, collecting every violation
pub fn verify<'a>(
    components: impl IntoIterator<Item = &'a Component>,
    sample_input: &str,
) -> ConformanceReport {
    Harness::default().verify(components, sample_input)
}
