//! Rendering of registries, load failures and conformance reports

use crate::conformance::api::ConformanceReport;
use crate::core::styles::StyleRole;
use crate::importer::api::{ComponentKind, ComponentRegistry, ComponentSummary, UnitFailure};
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::path::PathBuf;

/// Fixed line printed when every component conforms
pub const SUCCESS_MARKER: &str = "TEST_RESULT: All tests passed!";

/// Cell with a role colour applied when colour is enabled
fn styled_cell(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if use_color => cell.style_spec(&spec),
        _ => cell,
    }
}

fn kind_role(kind: ComponentKind) -> StyleRole {
    match kind {
        ComponentKind::Type => StyleRole::Type,
        ComponentKind::Callable => StyleRole::Callable,
    }
}

/// Registry as a table: one row per component, in registry order
pub fn component_table(registry: &ComponentRegistry, use_color: bool) -> String {
    if registry.is_empty() {
        return "No components registered.\n".to_string();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(
        ["Unit", "Declaration", "Kind", "Path"]
            .iter()
            .map(|title| styled_cell(title, StyleRole::Header, use_color))
            .collect(),
    ));

    for component in registry {
        let kind = component.kind();
        table.add_row(Row::new(vec![
            Cell::new(component.unit_name()),
            Cell::new(component.declaration()),
            styled_cell(&kind.to_string(), kind_role(kind), use_color),
            styled_cell(&component.unit_path().display().to_string(), StyleRole::Dim, use_color),
        ]));
    }

    table.to_string()
}

/// Human-readable lines for units that failed to load
pub fn failure_lines(failures: &[UnitFailure], use_color: bool) -> Vec<String> {
    failures
        .iter()
        .map(|failure| {
            format!(
                "{} {}: {}",
                StyleRole::Fail.paint("LOAD", use_color),
                failure.unit_name,
                failure.error
            )
        })
        .collect()
}

/// Human-readable conformance report
pub fn report_lines(report: &ConformanceReport, use_color: bool) -> Vec<String> {
    let mut lines: Vec<String> = report
        .violations
        .iter()
        .map(|violation| format!("{} {}", StyleRole::Fail.paint("FAIL", use_color), violation))
        .collect();

    let summary = format!(
        "{} checked, {} passed, {} failed",
        report.checked,
        report.passed,
        report.violations.len()
    );
    let role = if report.is_success() {
        StyleRole::Pass
    } else {
        StyleRole::Fail
    };
    lines.push(role.paint(&summary, use_color));
    lines
}

#[derive(Serialize)]
struct FailureView<'a> {
    unit_name: &'a str,
    unit_path: &'a PathBuf,
    error: String,
}

#[derive(Serialize)]
struct RunView<'a> {
    success: bool,
    components: Vec<ComponentSummary>,
    load_failures: Vec<FailureView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conformance: Option<&'a ConformanceReport>,
}

/// Whole run as a JSON document; `report` is `None` for `--list`
pub fn run_json(
    registry: &ComponentRegistry,
    failures: &[UnitFailure],
    report: Option<&ConformanceReport>,
) -> Result<String, serde_json::Error> {
    let view = RunView {
        success: failures.is_empty() && report.map_or(true, ConformanceReport::is_success),
        components: registry.summaries(),
        load_failures: failures
            .iter()
            .map(|failure| FailureView {
                unit_name: &failure.unit_name,
                unit_path: &failure.unit_path,
                error: failure.error.to_string(),
            })
            .collect(),
        conformance: report,
    };
    serde_json::to_string_pretty(&view)
}
