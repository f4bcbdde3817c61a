//! Logging setup on top of `flexi_logger`
//!
//! Three output formats are supported: `text` (default), `ext` (adds the
//! source location) and `json` (one compact object per line). Unit output
//! arrives under the `unit` target and is rendered like any other record.

use colored::Colorize;
use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use std::sync::{Mutex, OnceLock};

static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

/// Log levels in increasing verbosity, used to shift by `-v` / `-q`
const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Output format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Ext,
    Json,
}

/// Shift a base level by the number of `-v` (positive) or `-q` (negative) flags.
/// Unknown levels are returned unchanged so flexi_logger can report them.
pub fn shift_level(base: &str, shift: i8) -> String {
    let Some(index) = LEVELS.iter().position(|l| l.eq_ignore_ascii_case(base)) else {
        return base.to_string();
    };
    let shifted = (index as i16 + shift as i16).clamp(0, LEVELS.len() as i16 - 1);
    LEVELS[shifted as usize].to_string()
}

/// Start the global logger; only the first call in a process takes effect
pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = log_level.unwrap_or("info");
    let format: LogFormat = log_format.unwrap_or("text").parse()?;

    let mut logger = Logger::try_with_str(level)?;
    logger = match (format, color_enabled) {
        (LogFormat::Json, _) => logger.format(json_format),
        (LogFormat::Ext, true) => logger.format(extended_color_format),
        (LogFormat::Ext, false) => logger.format(extended_format),
        (LogFormat::Text, true) => logger.format(simple_color_format),
        (LogFormat::Text, false) => logger.format(simple_format),
    };

    if let Some(file_path) = log_file {
        logger = logger.log_to_file(FileSpec::try_from(std::path::Path::new(file_path))?);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));
    Ok(())
}

/// Change the active level after startup. Format and destination are fixed at init.
pub fn set_log_level(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle = LOGGER_HANDLE
        .get()
        .ok_or("Logger not initialised; call init_logging first")?;
    let mut handle = handle
        .lock()
        .map_err(|_| "Could not acquire logger handle lock")?;
    handle.parse_and_push_temp_spec(level)?;
    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    let abbr = level_abbr(level);
    match level {
        log::Level::Error => abbr.red().bold(),
        log::Level::Warn => abbr.yellow(),
        log::Level::Info => abbr.green(),
        log::Level::Debug => abbr.blue(),
        log::Level::Trace => abbr.magenta(),
    }
}

fn timestamp(now: &mut DeferredNow) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

// "YYYY-MM-DD HH:mm:ss.fff INF message"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}{}",
        timestamp(now),
        level_abbr(record.level()),
        unit_prefix(record.target()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}{}",
        timestamp(now).dimmed(),
        level_colored(record.level()),
        unit_prefix(record.target()).cyan(),
        record.args()
    )
}

// "YYYY-MM-DD HH:mm:ss.fff INF message (importer/loader.rs:42)"
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        timestamp(now),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        timestamp(now).dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let entry = serde_json::json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line()),
    });

    match serde_json::to_string(&entry) {
        Ok(line) => w.write_all(line.as_bytes()),
        Err(_) => w.write_all(br#"{"error":"Failed to serialize log message"}"#),
    }
}

// Unit output is tagged so it stands apart from host messages
fn unit_prefix(target: &str) -> &'static str {
    if target == crate::importer::api::UNIT_LOG_TARGET {
        "[unit] "
    } else {
        ""
    }
}

/// `dynimport::importer::loader` -> `importer/loader.rs:42`
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("dynimport::") {
        Some(module) => module.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line) => format!("{}:{}", path_like, line),
        None => path_like,
    }
}
