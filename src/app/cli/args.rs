//! Command-line arguments
//!
//! Every setting is optional here so that values left unset on the command
//! line fall through to the config file and then to the built-in defaults.

use crate::core::validation::{
    validate_extension, validate_glob_pattern, validate_identifier, validate_log_format,
    validate_log_level, validate_operation_limit,
};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dynimport")]
#[command(about = "Discover script units, register their components and check them against a calling contract")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Unit directory (default: ./modules)
    #[arg(value_name = "DIR", conflicts_with = "root_flag")]
    pub root: Option<PathBuf>,

    /// Unit directory
    #[arg(short = 'r', long = "root", value_name = "DIR")]
    pub root_flag: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Unit names to skip, as glob patterns*
    #[arg(short = 'x', long = "exclude", value_name = "PATTERNS", action = ArgAction::Append, value_delimiter = ',', value_parser = validate_glob_pattern)]
    pub exclude: Vec<String>,

    /// Only treat files with this extension as units
    #[arg(short = 'e', long = "extension", value_name = "EXT", value_parser = validate_extension)]
    pub extension: Option<String>,

    /// Process units in name order instead of directory order
    #[arg(short = 's', long = "sorted")]
    pub sorted: bool,

    /// Skip hidden entries in the unit directory
    #[arg(long = "skip-hidden")]
    pub skip_hidden: bool,

    /// Register every unit that loads and report the ones that do not
    #[arg(short = 'k', long = "keep-going")]
    pub keep_going: bool,

    /// Stop checking at the first contract violation
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Operation budget per unit evaluation or call (0 = unlimited)
    #[arg(long = "max-operations", value_name = "COUNT", value_parser = validate_operation_limit)]
    pub max_operations: Option<u64>,

    /// Input passed to every component
    #[arg(short = 'i', long = "sample-input", value_name = "TEXT")]
    pub sample_input: Option<String>,

    /// Contract operation called on constructed types
    #[arg(long = "method", value_name = "NAME", value_parser = validate_identifier)]
    pub method: Option<String>,

    /// Parameter name the contract operation must declare
    #[arg(long = "parameter", value_name = "NAME", value_parser = validate_identifier)]
    pub parameter: Option<String>,

    /// Expected result, with {input} and {unit} placeholders
    #[arg(long = "template", value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// List the registered components and exit
    #[arg(short = 'L', long = "list")]
    pub list: bool,

    /// Output format for results
    #[arg(long = "format", value_name = "FORMAT", value_enum)]
    pub format: Option<OutputFormat>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = validate_log_level)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = validate_log_format)]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Args {
    /// Unit directory from either the positional argument or `--root`
    pub fn root_dir(&self) -> Option<&PathBuf> {
        self.root.as_ref().or(self.root_flag.as_ref())
    }

    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`, `None` when unset
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Net verbosity: positive for `-v`, negative for `-q`
    pub fn verbosity(&self) -> i8 {
        let verbose = self.verbose.min(i8::MAX as u8) as i8;
        let quiet = self.quiet.min(i8::MAX as u8) as i8;
        verbose - quiet
    }
}
