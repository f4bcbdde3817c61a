//! Settings layering and the binary's run loop

use crate::common::{fixtures, UnitDir};
use clap::Parser;
use dynimport::app::cli::args::{Args, OutputFormat};
use dynimport::app::cli::config::{ConfigError, Settings};
use dynimport::app::cli::display::SUCCESS_MARKER;
use dynimport::app::startup::{
    run, EXIT_CONFORMANCE_FAILURE, EXIT_DISCOVERY_FAILURE, EXIT_SUCCESS,
};
use dynimport::importer::api::LoadPolicy;
use std::path::PathBuf;

fn args(list: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("dynimport").chain(list.iter().copied())).unwrap()
}

#[test]
fn test_config_file_then_command_line() {
    let units = UnitDir::with_units(&[("greeter.rhai", fixtures::GREETER)]);
    let config = units.write(
        "settings.toml",
        &format!(
            "root = {:?}\nsorted = true\nkeep_going = true\nsample_input = \"cfg\"\n",
            units.path().display().to_string()
        ),
    );

    let settings = Settings::resolve(&args(&[
        "--config-file",
        config.to_str().unwrap(),
        "--sample-input",
        "cli",
    ]))
    .unwrap();

    assert_eq!(settings.discovery.root, units.path());
    assert!(settings.discovery.sorted);
    assert_eq!(settings.policy, LoadPolicy::CollectErrors);
    assert_eq!(settings.sample_input, "cli");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = Settings::resolve(&args(&["--config-file", "/no/such/dynimport.toml"]));
    assert!(matches!(result, Err(ConfigError::Missing { .. })));
}

#[test]
fn test_run_prints_marker_for_conforming_units() {
    let units = UnitDir::with_units(&[
        ("greeter.rhai", fixtures::GREETER),
        ("welcome.rhai", fixtures::WELCOME),
    ]);
    let root = units.path().display().to_string();

    let mut settings = Settings::default();
    settings.apply_args(&args(&[root.as_str(), "--sorted"])).unwrap();
    let summary = run(&settings, false);

    assert_eq!(summary.exit_code, EXIT_SUCCESS);
    assert_eq!(summary.stdout, vec![SUCCESS_MARKER.to_string()]);
}

#[test]
fn test_run_reports_violations() {
    let units = UnitDir::with_units(&[("wrong.rhai", fixtures::WRONG_ANSWER)]);
    let root = units.path().display().to_string();

    let mut settings = Settings::default();
    settings.apply_args(&args(&["--root", root.as_str()])).unwrap();
    let summary = run(&settings, false);

    assert_eq!(summary.exit_code, EXIT_CONFORMANCE_FAILURE);
    assert!(summary.stdout.is_empty());
    assert!(summary.stderr.iter().any(|line| line.contains("wrong.rhai")));
}

#[test]
fn test_run_with_missing_root() {
    let mut settings = Settings::default();
    settings.discovery.root = PathBuf::from("/definitely/not/a/unit/dir");

    assert_eq!(run(&settings, false).exit_code, EXIT_DISCOVERY_FAILURE);
}

#[test]
fn test_json_output_is_a_single_document() {
    let units = UnitDir::with_units(&[("greeter.rhai", fixtures::GREETER)]);
    let root = units.path().display().to_string();

    let mut settings = Settings::default();
    settings
        .apply_args(&args(&[root.as_str(), "--format", "json"]))
        .unwrap();
    assert_eq!(settings.format, OutputFormat::Json);
    let summary = run(&settings, false);

    assert_eq!(summary.exit_code, EXIT_SUCCESS);
    assert_eq!(summary.stdout.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&summary.stdout[0]).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["components"].as_array().unwrap().len(), 2);
}

#[test]
fn test_custom_contract_from_command_line() {
    let units = UnitDir::with_units(&[(
        "bot.rhai",
        r#"export const Bot = blueprint(#{ hello: |name| unit_name() + " says " + name });"#,
    )]);
    let root = units.path().display().to_string();

    let mut settings = Settings::default();
    settings
        .apply_args(&args(&[
            root.as_str(),
            "--method",
            "hello",
            "--parameter",
            "name",
            "--template",
            "{unit} says {input}",
            "--sample-input",
            "hi",
        ]))
        .unwrap();

    assert_eq!(run(&settings, false).exit_code, EXIT_SUCCESS);
}
