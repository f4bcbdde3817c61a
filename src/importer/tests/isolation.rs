//! Isolation between units loaded in the same run

use super::utils::UnitDir;
use crate::importer::types::ComponentKind;
use rhai::Dynamic;
use serial_test::serial;

fn arg(value: &str) -> Vec<Dynamic> {
    vec![Dynamic::from(value.to_string())]
}

#[test]
fn test_identical_names_in_two_units_do_not_collide() {
    let units = UnitDir::new();
    units
        .unit("left.rhai", r#"fn shared(s) { "left:" + s }"#)
        .unit("right.rhai", r#"fn shared(s) { "right:" + s }"#);

    let registry = units.builder().build().unwrap();

    assert_eq!(registry.len(), 2);
    let left = &registry.components()[0];
    let right = &registry.components()[1];
    assert_eq!(left.declaration(), right.declaration());
    assert_ne!(left.unit_name(), right.unit_name());
    assert_ne!(left.unit_path(), right.unit_path());

    assert_eq!(left.call(arg("x")).unwrap().into_string().unwrap(), "left:x");
    assert_eq!(right.call(arg("x")).unwrap().into_string().unwrap(), "right:x");
}

#[test]
fn test_instances_of_same_named_blueprints_are_independent() {
    let units = UnitDir::new();
    let source = r#"
        export const Counter = blueprint(
            #{ greet: |s| { this.count += 1; this.count } },
            #{ count: 0 }
        );
    "#;
    units.unit("one.rhai", source).unit("two.rhai", source);

    let registry = units.builder().build().unwrap();
    let types = registry.of_kind(ComponentKind::Type);
    assert_eq!(types.len(), 2);

    let mut first = types[0].construct().unwrap();
    let mut second = types[1].construct().unwrap();
    first.call("greet", arg("a")).unwrap();
    first.call("greet", arg("a")).unwrap();
    let second_count = second.call("greet", arg("a")).unwrap();

    assert_eq!(second_count.as_int().unwrap(), 1);
    let first_state = first.state().clone().cast::<rhai::Map>();
    assert_eq!(first_state["count"].as_int().unwrap(), 2);
}

#[test]
fn test_init_sets_up_instance_state() {
    let units = UnitDir::new();
    units.unit(
        "tally.rhai",
        r#"
        export const Tally = blueprint(
            #{
                init: || { this.owner = unit_name(); },
                greet: |s| `${this.owner}:${s}`
            },
            #{ owner: "" }
        );
        "#,
    );

    let registry = units.builder().build().unwrap();
    let instance = registry.of_kind(ComponentKind::Type)[0].construct().unwrap();

    let state = instance.state().clone().cast::<rhai::Map>();
    assert_eq!(state["owner"].clone().into_string().unwrap(), "tally.rhai");
}

#[test]
fn test_unit_functions_keep_their_module_constants() {
    let units = UnitDir::new();
    units.unit(
        "greeter.rhai",
        r#"
        const PREFIX = "GREETING";
        fn make(s) { `${global::PREFIX}:${s}:${unit_name()}` }
        export const Greeter = blueprint(#{ greet: Fn("make") });
        fn greet(s) { `${global::PREFIX}:${s}:${unit_name()}` }
        "#,
    );

    let registry = units.builder().build().unwrap();

    let mut instance = registry.of_kind(ComponentKind::Type)[0].construct().unwrap();
    let from_type = instance.call("greet", arg("abc")).unwrap();
    assert_eq!(from_type.into_string().unwrap(), "GREETING:abc:greeter.rhai");

    for callable in registry.of_kind(ComponentKind::Callable) {
        let result = callable.call(arg("abc")).unwrap();
        assert_eq!(result.into_string().unwrap(), "GREETING:abc:greeter.rhai");
    }
}

#[test]
fn test_unit_cannot_see_another_units_functions() {
    let units = UnitDir::new();
    units
        .unit("a_provider.rhai", r#"fn provided(s) { s }"#)
        .unit("b_consumer.rhai", r#"let x = provided("hi");"#);

    let outcome = units.builder().build_collecting().unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].unit_name, "b_consumer.rhai");
}

#[test]
#[serial]
fn test_ambient_environment_is_shared_between_units() {
    let key = "DYNIMPORT_TEST_AMBIENT";
    std::env::remove_var(key);

    let units = UnitDir::new();
    units
        .unit("a_writer.rhai", r#"set_env("DYNIMPORT_TEST_AMBIENT", "seen");"#)
        .unit(
            "b_reader.rhai",
            r#"
            const OBSERVED = env("DYNIMPORT_TEST_AMBIENT");
            fn observed_value(s) { global::OBSERVED }
            "#,
        );

    let registry = units.builder().build().unwrap();

    assert_eq!(std::env::var(key).unwrap(), "seen");
    let reader = registry.from_unit("b_reader.rhai");
    assert_eq!(reader.len(), 1);
    let observed = reader[0].call(arg("ignored")).unwrap();
    assert_eq!(observed.into_string().unwrap(), "seen");
    std::env::remove_var(key);
}
