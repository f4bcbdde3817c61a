//! The calling contract over real unit directories

use crate::common::{fixtures, UnitDir};
use dynimport::conformance::api::{
    verify, Contract, ContractTemplate, Harness, HarnessMode, ViolationCause,
};
use dynimport::importer::api::ComponentKind;
use rhai::Dynamic;

#[test]
fn test_canonical_greeting_for_both_kinds() {
    let units = UnitDir::with_units(&[("greeter.rhai", fixtures::GREETER)]);
    let registry = units.builder().build().unwrap();

    let greeter = registry.of_kind(ComponentKind::Type)[0];
    let mut instance = greeter.construct().unwrap();
    let from_type = instance
        .call("greet", vec![Dynamic::from("abc".to_string())])
        .unwrap()
        .into_string()
        .unwrap();

    let greet = registry.of_kind(ComponentKind::Callable)[0];
    let from_callable = greet
        .call(vec![Dynamic::from("abc".to_string())])
        .unwrap()
        .into_string()
        .unwrap();

    assert_eq!(from_type, "GREETING:abc:greeter.rhai");
    assert_eq!(from_callable, "GREETING:abc:greeter.rhai");
}

#[test]
fn test_named_functions_read_unit_constants() {
    let units = UnitDir::with_units(&[("greeter.rhai", fixtures::CONSTANT_GREETER)]);
    let registry = units.builder().build().unwrap();

    let mut instance = registry.of_kind(ComponentKind::Type)[0].construct().unwrap();
    let from_type = instance
        .call("greet", vec![Dynamic::from("abc".to_string())])
        .unwrap()
        .into_string()
        .unwrap();
    let greet = registry
        .iter()
        .find(|component| component.declaration() == "greet")
        .unwrap();
    let from_callable = greet
        .call(vec![Dynamic::from("abc".to_string())])
        .unwrap()
        .into_string()
        .unwrap();

    assert_eq!(from_type, "GREETING:abc:greeter.rhai");
    assert_eq!(from_callable, "GREETING:abc:greeter.rhai");

    let report = verify(&registry, "abc");
    assert!(report.is_success(), "{:?}", report.violations);
    assert_eq!(report.checked, 3);
}

#[test]
fn test_conforming_directory_passes() {
    let units = UnitDir::with_units(&[
        ("greeter.rhai", fixtures::GREETER),
        ("welcome.rhai", fixtures::WELCOME),
        ("derived.rhai", fixtures::DERIVED),
        ("abstract.rhai", fixtures::ABSTRACT_ONLY),
    ]);
    let registry = units.builder().build().unwrap();

    let report = verify(&registry, "abc");

    assert!(report.is_success(), "{:?}", report.violations);
    assert_eq!(report.checked, registry.len());
}

#[test]
fn test_violations_carry_their_origin() {
    let units = UnitDir::with_units(&[
        ("greeter.rhai", fixtures::GREETER),
        ("wrong.rhai", fixtures::WRONG_ANSWER),
    ]);
    let registry = units.builder().build().unwrap();

    let report = verify(&registry, "abc");

    assert_eq!(report.passed, 2);
    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.unit_name, "wrong.rhai");
    assert_eq!(violation.unit_path, units.path().join("wrong.rhai"));
    assert_eq!(
        violation.cause,
        ViolationCause::Mismatch {
            expected: "GREETING:abc:wrong.rhai".to_string(),
            actual: "hello there".to_string(),
        }
    );
}

#[test]
fn test_fail_fast_checks_fewer_components() {
    let units = UnitDir::with_units(&[
        ("a.rhai", fixtures::WRONG_ANSWER),
        ("b.rhai", fixtures::WRONG_ANSWER),
        ("c.rhai", fixtures::GREETER),
    ]);
    let registry = units.builder().build().unwrap();

    let report = Harness::new(Contract::default(), HarnessMode::FailFast).verify(&registry, "abc");

    assert_eq!(report.checked, 1);
    assert_eq!(report.violations.len(), 1);
}

#[test]
fn test_sample_input_flows_into_expectation() {
    let units = UnitDir::with_units(&[("welcome.rhai", fixtures::WELCOME)]);
    let registry = units.builder().build().unwrap();

    assert!(verify(&registry, "xyz").is_success());

    let strict = Harness::new(
        Contract {
            template: ContractTemplate::new("GREETING:{input}").unwrap(),
            ..Contract::default()
        },
        HarnessMode::CollectAll,
    );
    assert!(!strict.verify(&registry, "xyz").is_success());
}
