//! Layered run configuration
//!
//! Built-in defaults are overlaid by a TOML config file and then by
//! command-line flags. The config file comes from `--config-file` or, when
//! that is absent, `<config_dir>/dynimport/dynimport.toml` if it exists.
//!
//! ```toml
//! root = "./modules"
//! exclude = ["draft_*", "*.bak"]
//! extension = "rhai"
//! sorted = true
//! keep_going = false
//! max_operations = 1000000
//! sample_input = "abc"
//!
//! [contract]
//! method = "greet"
//! parameter = "s"
//! template = "GREETING:{input}:{unit}"
//! ```

use super::args::{Args, OutputFormat};
use crate::conformance::api::{Contract, ContractTemplate, HarnessMode, DEFAULT_SAMPLE_INPUT};
use crate::core::error_handling::ContextualError;
use crate::core::validation::{
    validate_extension, validate_glob_pattern, validate_identifier, validate_log_format,
    validate_log_level,
};
use crate::importer::api::{DiscoveryConfig, LoadPolicy, LoaderOptions};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "dynimport";
const CONFIG_FILE_NAME: &str = "dynimport.toml";

/// Result type alias for configuration handling
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file does not exist: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Cannot read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { .. } => Some("The configuration file named on the command line was not found"),
            ConfigError::Parse { .. } => Some("The configuration file is not valid TOML"),
            ConfigError::InvalidValue { .. } => Some("A configuration value is invalid"),
            ConfigError::Read { .. } => None,
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub discovery: DiscoveryConfig,
    pub loader: LoaderOptions,
    pub policy: LoadPolicy,
    pub mode: HarnessMode,
    pub contract: Contract,
    pub sample_input: String,
    pub list: bool,
    pub format: OutputFormat,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
    /// `None` means decide from the terminal
    pub color: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            loader: LoaderOptions::default(),
            policy: LoadPolicy::default(),
            mode: HarnessMode::default(),
            contract: Contract::default(),
            sample_input: DEFAULT_SAMPLE_INPUT.to_string(),
            list: false,
            format: OutputFormat::default(),
            log_level: None,
            log_format: None,
            log_file: None,
            color: None,
        }
    }
}

/// `<config_dir>/dynimport/dynimport.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read the config file to use, if any. An explicitly named file must exist.
pub fn load_config_file(explicit: Option<&Path>) -> ConfigResult<Option<toml::Table>> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    log::debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let table = contents
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::Parse {
            path,
            message: e.to_string(),
        })?;
    Ok(Some(table))
}

fn string_value<'a>(config: &'a toml::Table, key: &str) -> ConfigResult<Option<&'a str>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, "expected a string")),
    }
}

fn bool_value(config: &toml::Table, key: &str) -> ConfigResult<Option<bool>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, "expected true or false")),
    }
}

/// A single string or an array of strings; each item may itself be comma-separated
fn string_list_value(config: &toml::Table, key: &str) -> ConfigResult<Vec<String>> {
    let items: Vec<&str> = match config.get(key) {
        None => return Ok(Vec::new()),
        Some(toml::Value::String(s)) => vec![s.as_str()],
        Some(toml::Value::Array(array)) => array
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| ConfigError::invalid(key, "expected an array of strings"))
            })
            .collect::<ConfigResult<_>>()?,
        Some(_) => return Err(ConfigError::invalid(key, "expected a string or an array of strings")),
    };

    Ok(items
        .into_iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

fn checked(key: &str, result: Result<String, String>) -> ConfigResult<String> {
    result.map_err(|message| ConfigError::invalid(key, message))
}

impl Settings {
    /// Defaults, then the config file, then the command line
    pub fn resolve(args: &Args) -> ConfigResult<Self> {
        let mut settings = Settings::default();
        if let Some(config) = load_config_file(args.config_file.as_deref())? {
            settings.apply_toml_values(&config)?;
        }
        settings.apply_args(args)?;
        Ok(settings)
    }

    /// Overlay values from a parsed config file
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> ConfigResult<()> {
        if let Some(root) = string_value(config, "root")? {
            self.discovery.root = PathBuf::from(root);
        }
        for pattern in string_list_value(config, "exclude")? {
            let pattern = checked("exclude", validate_glob_pattern(&pattern))?;
            if !self.discovery.exclude.contains(&pattern) {
                self.discovery.exclude.push(pattern);
            }
        }
        if let Some(extension) = string_value(config, "extension")? {
            self.discovery.extension = Some(checked("extension", validate_extension(extension))?);
        }
        if let Some(sorted) = bool_value(config, "sorted")? {
            self.discovery.sorted = sorted;
        }
        if let Some(skip_hidden) = bool_value(config, "skip_hidden")? {
            self.discovery.skip_hidden = skip_hidden;
        }
        if let Some(keep_going) = bool_value(config, "keep_going")? {
            self.policy = if keep_going {
                LoadPolicy::CollectErrors
            } else {
                LoadPolicy::AllOrNothing
            };
        }
        if let Some(fail_fast) = bool_value(config, "fail_fast")? {
            self.mode = if fail_fast {
                HarnessMode::FailFast
            } else {
                HarnessMode::CollectAll
            };
        }
        if let Some(value) = config.get("max_operations") {
            let limit = value
                .as_integer()
                .filter(|n| *n >= 0)
                .ok_or_else(|| ConfigError::invalid("max_operations", "expected a non-negative integer"))?;
            self.loader.max_operations = limit as u64;
        }
        if let Some(input) = string_value(config, "sample_input")? {
            self.sample_input = input.to_string();
        }

        match config.get("contract") {
            None => {}
            Some(toml::Value::Table(contract)) => self.apply_contract_table(contract)?,
            Some(_) => return Err(ConfigError::invalid("contract", "expected a table")),
        }

        if let Some(level) = string_value(config, "log_level")? {
            self.log_level = Some(checked("log_level", validate_log_level(level))?);
        }
        if let Some(format) = string_value(config, "log_format")? {
            self.log_format = Some(checked("log_format", validate_log_format(format))?);
        }
        if let Some(file) = string_value(config, "log_file")? {
            self.log_file = log_file_setting(Path::new(file));
        }
        if let Some(color) = bool_value(config, "color")? {
            self.color = Some(color);
        }
        Ok(())
    }

    fn apply_contract_table(&mut self, contract: &toml::Table) -> ConfigResult<()> {
        if let Some(method) = string_value(contract, "method")? {
            self.contract.method = checked("contract.method", validate_identifier(method))?;
        }
        if let Some(parameter) = string_value(contract, "parameter")? {
            self.contract.parameter = checked("contract.parameter", validate_identifier(parameter))?;
        }
        if let Some(template) = string_value(contract, "template")? {
            self.contract.template = ContractTemplate::new(template)
                .map_err(|message| ConfigError::invalid("contract.template", message))?;
        }
        Ok(())
    }

    /// Overlay values given on the command line
    pub fn apply_args(&mut self, args: &Args) -> ConfigResult<()> {
        if let Some(root) = args.root_dir() {
            self.discovery.root = root.clone();
        }
        for pattern in &args.exclude {
            if !self.discovery.exclude.contains(pattern) {
                self.discovery.exclude.push(pattern.clone());
            }
        }
        if let Some(extension) = &args.extension {
            self.discovery.extension = Some(extension.clone());
        }
        self.discovery.sorted |= args.sorted;
        self.discovery.skip_hidden |= args.skip_hidden;
        if args.keep_going {
            self.policy = LoadPolicy::CollectErrors;
        }
        if args.fail_fast {
            self.mode = HarnessMode::FailFast;
        }
        if let Some(limit) = args.max_operations {
            self.loader.max_operations = limit;
        }
        if let Some(input) = &args.sample_input {
            self.sample_input = input.clone();
        }
        if let Some(method) = &args.method {
            self.contract.method = method.clone();
        }
        if let Some(parameter) = &args.parameter {
            self.contract.parameter = parameter.clone();
        }
        self.list |= args.list;
        if let Some(format) = args.format {
            self.format = format;
        }
        if args.log_level.is_some() {
            self.log_level = args.log_level.clone();
        }
        if args.log_format.is_some() {
            self.log_format = args.log_format.clone();
        }
        if let Some(file) = &args.log_file {
            self.log_file = log_file_setting(file);
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
        // Last, so every other flag is applied even when the template is rejected
        if let Some(template) = &args.template {
            self.contract.template = ContractTemplate::new(template.as_str())
                .map_err(|message| ConfigError::invalid("template", message))?;
        }
        Ok(())
    }
}

// "none" and "-" turn file logging off
fn log_file_setting(path: &Path) -> Option<PathBuf> {
    let text = path.to_string_lossy();
    if text.eq_ignore_ascii_case("none") || text == "-" {
        None
    } else {
        Some(path.to_path_buf())
    }
}
