//! Import Test Utilities
//!
//! Temporary unit directories and a few canned unit sources shared by the
//! pipeline test suites.

use crate::importer::discovery::DiscoveryConfig;
use crate::importer::registry::RegistryBuilder;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Concrete blueprint and a named function, both following the greeting contract
pub const GREETER_UNIT: &str = r#"
export const Greeter = blueprint(#{
    greet: |s| `GREETING:${s}:${unit_name()}`
});

fn greet(s) {
    `GREETING:${s}:${unit_name()}`
}
"#;

/// Single callable following the greeting contract
pub const CALLABLE_UNIT: &str = r#"
fn welcome(s) {
    `GREETING:${s}:${unit_name()}`
}
"#;

/// Temporary directory of units
pub struct UnitDir {
    dir: TempDir,
}

impl UnitDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn unit(&self, name: &str, source: &str) -> &Self {
        std::fs::write(self.dir.path().join(name), source).unwrap();
        self
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Builder with sorted discovery so tests see a stable unit order
    pub fn builder(&self) -> RegistryBuilder {
        RegistryBuilder::new(DiscoveryConfig {
            sorted: true,
            ..DiscoveryConfig::with_root(self.path())
        })
    }
}
