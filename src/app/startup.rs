//! Process entry: parse arguments, resolve settings, start logging, then run
//! discovery followed by the conformance pass.

use crate::app::cli::args::{Args, OutputFormat};
use crate::app::cli::config::{ConfigError, Settings};
use crate::app::cli::display::{
    component_table, failure_lines, report_lines, run_json, SUCCESS_MARKER,
};
use crate::conformance::api::Harness;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, shift_level};
use crate::core::styles::palette_to_clap;
use crate::importer::api::RegistryBuilder;
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;

pub const EXIT_SUCCESS: i32 = 0;
/// At least one component violated the calling contract
pub const EXIT_CONFORMANCE_FAILURE: i32 = 1;
/// Configuration, discovery or unit loading failed
pub const EXIT_DISCOVERY_FAILURE: i32 = 2;

/// What a run produced, before anything is written to the terminal
#[derive(Debug, Default)]
pub struct RunSummary {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl RunSummary {
    fn failed(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }
}

/// Run the binary and return its exit code
pub fn startup() -> i32 {
    let args = match parse_args(std::io::stdout().is_terminal()) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let resolved = Settings::resolve(&args);
    let (settings, fallback_error) = match &resolved {
        Ok(settings) => (settings.clone(), None),
        Err(_) => fallback_settings(&args),
    };

    let use_color = settings
        .color
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    let level = shift_level(
        settings.log_level.as_deref().unwrap_or("info"),
        args.verbosity(),
    );
    let log_file = settings.log_file.as_ref().map(|p| p.to_string_lossy());
    if let Err(e) = init_logging(
        Some(level.as_str()),
        settings.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: cannot start logging: {}", e);
        return EXIT_DISCOVERY_FAILURE;
    }

    if let Err(e) = resolved {
        if let Some(second) = fallback_error {
            log::debug!("Command-line settings also rejected: {}", second);
        }
        log_error_with_context(&e, "Configuration loading");
        return EXIT_DISCOVERY_FAILURE;
    }

    log::debug!("Settings: {:?}", settings);
    let summary = run(&settings, use_color);
    for line in &summary.stdout {
        println!("{}", line);
    }
    for line in &summary.stderr {
        eprintln!("{}", line);
    }
    summary.exit_code
}

/// Defaults overlaid with the command line, used to start logging when the
/// configuration could not be resolved
fn fallback_settings(args: &Args) -> (Settings, Option<ConfigError>) {
    let mut fallback = Settings::default();
    let error = fallback.apply_args(args).err();
    (fallback, error)
}

fn parse_args(use_color: bool) -> Result<Args, i32> {
    Args::command()
        .styles(palette_to_clap(use_color))
        .try_get_matches()
        .and_then(|matches| Args::from_arg_matches(&matches))
        .map_err(|e| {
            let _ = e.print();
            e.exit_code()
        })
}

/// Discovery, then either the listing or the conformance pass
pub fn run(settings: &Settings, use_color: bool) -> RunSummary {
    log::info!(
        "Discovering units in {}",
        settings.discovery.root.display()
    );

    let outcome = match RegistryBuilder::new(settings.discovery.clone())
        .with_loader_options(settings.loader)
        .build_with_policy(settings.policy)
    {
        Ok(outcome) => outcome,
        Err(e) => {
            log_error_with_context(&e, "Component discovery");
            return RunSummary::failed(EXIT_DISCOVERY_FAILURE);
        }
    };
    log::info!(
        "Registered {} components ({} units failed to load)",
        outcome.registry.len(),
        outcome.failures.len()
    );

    let mut summary = RunSummary::default();
    let load_code = if outcome.is_clean() {
        EXIT_SUCCESS
    } else {
        EXIT_DISCOVERY_FAILURE
    };

    if settings.list {
        match settings.format {
            OutputFormat::Json => push_json(&mut summary, run_json(&outcome.registry, &outcome.failures, None)),
            OutputFormat::Text => {
                summary
                    .stdout
                    .push(component_table(&outcome.registry, use_color).trim_end().to_string());
                summary.stderr.extend(failure_lines(&outcome.failures, use_color));
            }
        }
        summary.exit_code = summary.exit_code.max(load_code);
        return summary;
    }

    let harness = Harness::new(settings.contract.clone(), settings.mode);
    let report = harness.verify(&outcome.registry, &settings.sample_input);
    let code = if !outcome.is_clean() {
        EXIT_DISCOVERY_FAILURE
    } else if !report.is_success() {
        EXIT_CONFORMANCE_FAILURE
    } else {
        EXIT_SUCCESS
    };

    match settings.format {
        OutputFormat::Json => {
            push_json(&mut summary, run_json(&outcome.registry, &outcome.failures, Some(&report)))
        }
        OutputFormat::Text => {
            summary.stderr.extend(failure_lines(&outcome.failures, use_color));
            if code == EXIT_SUCCESS {
                summary.stdout.push(SUCCESS_MARKER.to_string());
            } else {
                summary.stderr.extend(report_lines(&report, use_color));
            }
        }
    }

    summary.exit_code = summary.exit_code.max(code);
    summary
}

fn push_json(summary: &mut RunSummary, rendered: Result<String, serde_json::Error>) {
    match rendered {
        Ok(json) => summary.stdout.push(json),
        Err(e) => {
            log::error!("FATAL: cannot render JSON output: {}", e);
            summary.exit_code = EXIT_DISCOVERY_FAILURE;
        }
    }
}
