//! Value validation shared by command-line parsing and the config file
//!
//! Each validator returns the normalised value or a message suitable for
//! direct display, so they can back clap `value_parser`s as well as TOML keys.

use crate::core::logging::LogFormat;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Validate an operation budget; 0 means unlimited
pub fn validate_operation_limit(value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("'{}' is not a valid non-negative integer", value))
}

/// Validate a unit file extension, stripping a leading dot
pub fn validate_extension(ext: &str) -> Result<String, String> {
    let cleaned = ext.strip_prefix('.').unwrap_or(ext);

    if cleaned.is_empty() {
        return Err("Extension cannot be empty".to_string());
    }
    if cleaned.contains('/') || cleaned.contains('\\') {
        return Err("Extension cannot contain path separators".to_string());
    }

    Ok(cleaned.to_lowercase())
}

/// Validate glob pattern syntax
pub fn validate_glob_pattern(pattern: &str) -> Result<String, String> {
    glob::Pattern::new(pattern)
        .map(|_| pattern.to_string())
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))
}

/// Validate a log level name
pub fn validate_log_level(level: &str) -> Result<String, String> {
    let lowered = level.to_lowercase();
    if LOG_LEVELS.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(format!(
            "'{}' is not a log level (expected one of {})",
            level,
            LOG_LEVELS.join(", ")
        ))
    }
}

/// Validate a log format name
pub fn validate_log_format(format: &str) -> Result<String, String> {
    format
        .parse::<LogFormat>()
        .map(|f| f.to_string())
        .map_err(|_| format!("'{}' is not a log format (expected text, ext or json)", format))
}

/// Validate a contract method or parameter name: a Rhai identifier
pub fn validate_identifier(name: &str) -> Result<String, String> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name.to_string())
    } else {
        Err(format!("'{}' is not a valid identifier", name))
    }
}
