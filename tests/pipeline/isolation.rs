//! Units loaded in one run keep separate namespaces

use crate::common::UnitDir;
use dynimport::conformance::api::{verify, ViolationCause};
use serial_test::serial;

#[test]
fn test_same_names_in_different_units_do_not_collide() {
    let units = UnitDir::with_units(&[
        ("first.rhai", r#"const WHO = "first"; fn greet(s) { `GREETING:${s}:${unit_name()}` } fn who() { "first" }"#),
        ("second.rhai", r#"const WHO = "second"; fn greet(s) { `GREETING:${s}:${unit_name()}` } fn who() { "second" }"#),
    ]);
    let registry = units.builder().build().unwrap();

    let answers: Vec<String> = registry
        .iter()
        .filter(|c| c.declaration() == "who")
        .map(|c| c.call(vec![]).unwrap().into_string().unwrap())
        .collect();

    assert_eq!(answers, vec!["first", "second"]);
}

#[test]
fn test_unit_cannot_call_another_units_function() {
    let units = UnitDir::with_units(&[
        ("a_helper.rhai", r#"fn shared_helper(s) { s }"#),
        ("b_user.rhai", r#"fn greet(s) { shared_helper(s) }"#),
    ]);
    let registry = units.builder().build().unwrap();

    let report = verify(&registry, "abc");

    let user = report
        .violations
        .iter()
        .find(|v| v.unit_name == "b_user.rhai")
        .expect("b_user.rhai should fail");
    assert!(matches!(
        &user.cause,
        ViolationCause::Invocation { message } if message.contains("shared_helper")
    ));
}

#[test]
#[serial]
fn test_environment_is_shared_between_units() {
    std::env::remove_var("DYNIMPORT_PIPELINE_SHARED");
    let units = UnitDir::with_units(&[
        ("a_writer.rhai", r#"set_env("DYNIMPORT_PIPELINE_SHARED", "from-a");"#),
        ("b_reader.rhai", r#"export const seen = || env("DYNIMPORT_PIPELINE_SHARED");"#),
    ]);
    let registry = units.builder().build().unwrap();

    let seen = registry.from_unit("b_reader.rhai")[0]
        .call(vec![])
        .unwrap()
        .into_string()
        .unwrap();

    assert_eq!(seen, "from-a");
    std::env::remove_var("DYNIMPORT_PIPELINE_SHARED");
}
