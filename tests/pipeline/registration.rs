//! Registry contents, ordering and load-failure policies

use crate::common::{fixtures, UnitDir};
use dynimport::importer::api::{
    register, register_collecting, ComponentKind, DiscoveryConfig, ImportError, LoadPolicy,
    RegistryBuilder,
};

#[test]
fn test_registry_order_follows_units_then_kinds() {
    let units = UnitDir::with_units(&[("u1.rhai", fixtures::GREETER), ("u2.rhai", fixtures::WELCOME)]);

    let registry = units.builder().build().unwrap();
    let order: Vec<(String, ComponentKind)> = registry
        .origins()
        .into_iter()
        .map(|(name, _, kind)| (name, kind))
        .collect();

    assert_eq!(
        order,
        vec![
            ("u1.rhai".to_string(), ComponentKind::Type),
            ("u1.rhai".to_string(), ComponentKind::Callable),
            ("u2.rhai".to_string(), ComponentKind::Callable),
        ]
    );
}

#[test]
fn test_origins_point_at_unit_files() {
    let units = UnitDir::with_units(&[("greeter.rhai", fixtures::GREETER)]);

    let registry = units.builder().build().unwrap();

    for (_, path, _) in registry.origins() {
        assert_eq!(path, units.path().join("greeter.rhai"));
    }
}

#[test]
fn test_one_broken_unit_fails_the_whole_run() {
    let units = UnitDir::with_units(&[
        ("a_good.rhai", fixtures::GREETER),
        ("b_broken.rhai", fixtures::SYNTAX_ERROR),
        ("c_good.rhai", fixtures::WELCOME),
    ]);

    let error = units.builder().build().unwrap_err();

    assert!(matches!(error, ImportError::UnitLoad { .. }));
    assert_eq!(error.unit_name(), Some("b_broken.rhai"));
}

#[test]
fn test_initialisation_failure_is_a_load_error() {
    let units = UnitDir::with_units(&[("loud.rhai", fixtures::THROWS_ON_LOAD)]);

    let error = units.builder().build().unwrap_err();

    assert_eq!(error.unit_name(), Some("loud.rhai"));
    assert!(error.to_string().contains("refusing to load"), "{}", error);
}

#[test]
fn test_collecting_keeps_good_units() {
    let units = UnitDir::with_units(&[
        ("a_good.rhai", fixtures::GREETER),
        ("b_broken.rhai", fixtures::SYNTAX_ERROR),
        ("c_good.rhai", fixtures::WELCOME),
    ]);

    let outcome = units.builder().build_with_policy(LoadPolicy::CollectErrors).unwrap();

    assert!(!outcome.is_clean());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].unit_name, "b_broken.rhai");
    assert_eq!(outcome.registry.len(), 3);
    assert!(outcome.registry.from_unit("b_broken.rhai").is_empty());
}

#[test]
fn test_register_entry_points() {
    let units = UnitDir::with_units(&[("only.rhai", fixtures::WELCOME)]);

    let registry = register(units.path()).unwrap();
    let outcome = register_collecting(units.path()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(outcome.registry.len(), 1);
    assert!(outcome.is_clean());
}

#[test]
fn test_abstract_declarations_contribute_nothing() {
    let units = UnitDir::with_units(&[
        ("abstract.rhai", fixtures::ABSTRACT_ONLY),
        ("derived.rhai", fixtures::DERIVED),
    ]);

    let registry = units.builder().build().unwrap();
    let declared: Vec<&str> = registry.iter().map(|c| c.declaration()).collect();

    assert_eq!(declared, vec!["Polite"]);
    assert!(registry.from_unit("abstract.rhai").is_empty());
}

#[test]
fn test_repeated_runs_are_identical() {
    let units = UnitDir::with_units(&[
        ("u1.rhai", fixtures::GREETER),
        ("u2.rhai", fixtures::WELCOME),
        ("u3.rhai", fixtures::DERIVED),
    ]);
    let builder = units.builder();

    let first = builder.build().unwrap().origins();
    let second = builder.build().unwrap().origins();

    assert_eq!(first, second);
}

#[test]
fn test_discovery_options_filter_units() {
    let units = UnitDir::with_units(&[
        ("greeter.rhai", fixtures::GREETER),
        ("draft_greeter.rhai", fixtures::WRONG_ANSWER),
        ("notes.txt", "not a unit"),
    ]);

    let registry = RegistryBuilder::new(DiscoveryConfig {
        exclude: vec!["draft_*".to_string()],
        extension: Some("rhai".to_string()),
        ..units.discovery()
    })
    .build()
    .unwrap();

    assert!(registry.iter().all(|c| c.unit_name() == "greeter.rhai"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_missing_root_is_not_found() {
    let units = UnitDir::new();

    let error = register(&units.path().join("nowhere")).unwrap_err();

    assert!(matches!(error, ImportError::NotFound { .. }));
}

#[test]
fn test_empty_directory_yields_empty_registry() {
    let units = UnitDir::new();
    assert!(register(units.path()).unwrap().is_empty());
}
