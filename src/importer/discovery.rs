//! Unit Discovery
//!
//! Lists the candidate source units contained directly in a root directory.
//! Sub-directories are never recursed into and never reported as units.
//!
//! With the default configuration every non-directory entry is a unit, reported
//! in whatever order the platform's directory listing produces. The optional
//! settings narrow the listing (exclusion globs, a required extension, hidden
//! entries) or make its order stable across platforms.

use crate::importer::error::{ImportError, ImportResult};
use std::path::{Path, PathBuf};

/// Conventional unit directory used when none is configured
pub const DEFAULT_UNIT_DIR: &str = "./modules";

/// Configuration for unit discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Directory containing the units
    pub root: PathBuf,
    /// Glob patterns matched against entry names; matching entries are skipped
    pub exclude: Vec<String>,
    /// Only entries with this extension are units (no leading dot)
    pub extension: Option<String>,
    /// Sort unit names so discovery order is stable across platforms
    pub sorted: bool,
    /// Skip entries whose name starts with '.'
    pub skip_hidden: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_UNIT_DIR),
            exclude: Vec::new(),
            extension: None,
            sorted: false,
            skip_hidden: false,
        }
    }
}

impl DiscoveryConfig {
    /// Create discovery configuration for a root directory with default options
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Resolve the load path of a unit found under the root
    pub fn unit_path(&self, unit_name: &str) -> PathBuf {
        self.root.join(unit_name)
    }
}

/// Locates units in a directory according to a discovery configuration
pub struct UnitLocator {
    config: DiscoveryConfig,
    exclusions: Vec<glob::Pattern>,
}

impl UnitLocator {
    /// Create a locator, compiling the configured exclusion patterns
    pub fn new(config: DiscoveryConfig) -> ImportResult<Self> {
        let exclusions = config
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| ImportError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<ImportResult<Vec<_>>>()?;

        Ok(Self { config, exclusions })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// List the unit names found directly under the configured root
    pub fn locate(&self) -> ImportResult<Vec<String>> {
        let root = &self.config.root;
        let entries = std::fs::read_dir(root).map_err(|source| ImportError::NotFound {
            path: root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ImportError::NotFound {
                path: root.clone(),
                source,
            })?;

            // Follows symlinks so a link to a directory is also skipped
            if entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if self.accepts(&name) {
                names.push(name);
            } else {
                log::trace!("Skipping '{}' in {}", name, root.display());
            }
        }

        if self.config.sorted {
            names.sort();
        }

        log::debug!("Located {} units in {}", names.len(), root.display());
        Ok(names)
    }

    fn accepts(&self, name: &str) -> bool {
        if self.config.skip_hidden && name.starts_with('.') {
            return false;
        }

        if let Some(extension) = &self.config.extension {
            let matches = Path::new(name)
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if !matches {
                return false;
            }
        }

        !self.exclusions.iter().any(|pattern| pattern.matches(name))
    }
}

/// List every non-directory entry directly under `root`
pub fn locate(root: &Path) -> ImportResult<Vec<String>> {
    UnitLocator::new(DiscoveryConfig::with_root(root))?.locate()
}
