//! Common test utilities and fixtures
//!
//! Unit directories on disk plus canned unit sources used across the
//! integration suites.

#![allow(dead_code)]

pub mod fixtures;

use dynimport::importer::api::{DiscoveryConfig, RegistryBuilder};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory populated with units
pub struct UnitDir {
    dir: TempDir,
}

impl UnitDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp unit dir"),
        }
    }

    /// Directory pre-populated with `(name, source)` units
    pub fn with_units(units: &[(&str, &str)]) -> Self {
        let dir = Self::new();
        for (name, source) in units {
            dir.write(name, source);
        }
        dir
    }

    pub fn write(&self, name: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, source).expect("write unit");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Discovery with a stable, name-sorted unit order
    pub fn discovery(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            sorted: true,
            ..DiscoveryConfig::with_root(self.path())
        }
    }

    pub fn builder(&self) -> RegistryBuilder {
        RegistryBuilder::new(self.discovery())
    }
}
