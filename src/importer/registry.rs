//! Component Registry
//!
//! Runs the whole pipeline over a unit directory: locate, then for each unit
//! load, introspect and filter, appending the survivors in discovery order.
//!
//! Two failure policies are available. [`LoadPolicy::AllOrNothing`] aborts the
//! run on the first unit that fails to load and returns no components at all.
//! [`LoadPolicy::CollectErrors`] keeps going and reports every failed unit next
//! to the components of the units that did load.

use crate::importer::discovery::{DiscoveryConfig, UnitLocator};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::filter::{filter_callables, filter_types};
use crate::importer::introspect::introspect;
use crate::importer::loader::{LoaderOptions, UnitLoader};
use crate::importer::types::{Component, ComponentKind, ComponentSummary};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// How unit load failures affect a discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// First failure aborts the run
    #[default]
    AllOrNothing,
    /// Failures are recorded and the remaining units are still processed
    CollectErrors,
}

/// Ordered sequence of components produced by one discovery run
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: Vec<Component>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field(
                "components",
                &self
                    .components
                    .iter()
                    .map(|c| format!("{}::{} ({})", c.unit_name(), c.declaration(), c.kind()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn extend(&mut self, components: Vec<Component>) {
        self.components.extend(components);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn into_components(self) -> Vec<Component> {
        self.components
    }

    /// Components of one kind, in registry order
    pub fn of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.components.iter().filter(|c| c.kind() == kind).collect()
    }

    /// Components that came from the named unit, in registry order
    pub fn from_unit(&self, unit_name: &str) -> Vec<&Component> {
        self.components
            .iter()
            .filter(|c| c.unit_name() == unit_name)
            .collect()
    }

    /// `(unit_name, unit_path, kind)` tuples in registry order
    pub fn origins(&self) -> Vec<(String, PathBuf, ComponentKind)> {
        self.components
            .iter()
            .map(|c| (c.unit_name().to_string(), c.unit_path().to_path_buf(), c.kind()))
            .collect()
    }

    pub fn summaries(&self) -> Vec<ComponentSummary> {
        self.components.iter().map(Component::summary).collect()
    }
}

impl<'a> IntoIterator for &'a ComponentRegistry {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// A unit that could not be loaded under [`LoadPolicy::CollectErrors`]
#[derive(Debug)]
pub struct UnitFailure {
    pub unit_name: String,
    pub unit_path: PathBuf,
    pub error: ImportError,
}

/// Result of a discovery run that collects unit failures
#[derive(Debug, Default)]
pub struct RegistryOutcome {
    pub registry: ComponentRegistry,
    pub failures: Vec<UnitFailure>,
}

impl RegistryOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestrates discovery, loading, introspection and filtering
pub struct RegistryBuilder {
    discovery: DiscoveryConfig,
    loader: UnitLoader,
}

impl RegistryBuilder {
    pub fn new(discovery: DiscoveryConfig) -> Self {
        Self {
            discovery,
            loader: UnitLoader::default(),
        }
    }

    pub fn with_loader_options(mut self, options: LoaderOptions) -> Self {
        self.loader = UnitLoader::new(options);
        self
    }

    /// Build the registry, failing the whole run on the first unit load error
    pub fn build(&self) -> ImportResult<ComponentRegistry> {
        let mut registry = ComponentRegistry::new();
        for unit_name in self.locate()? {
            let components = self.process_unit(&unit_name)?;
            registry.extend(components);
        }
        log::debug!("Registry built with {} components", registry.len());
        Ok(registry)
    }

    /// Build the registry from every unit that loads, recording the ones that do not
    pub fn build_collecting(&self) -> ImportResult<RegistryOutcome> {
        let mut outcome = RegistryOutcome::default();
        for unit_name in self.locate()? {
            match self.process_unit(&unit_name) {
                Ok(components) => outcome.registry.extend(components),
                Err(error) => {
                    log::warn!("Skipping unit '{}': {}", unit_name, error);
                    outcome.failures.push(UnitFailure {
                        unit_path: self.discovery.unit_path(&unit_name),
                        unit_name,
                        error,
                    });
                }
            }
        }
        log::debug!(
            "Registry built with {} components, {} failed units",
            outcome.registry.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Build with the given policy; under `AllOrNothing` the outcome never has failures
    pub fn build_with_policy(&self, policy: LoadPolicy) -> ImportResult<RegistryOutcome> {
        match policy {
            LoadPolicy::AllOrNothing => Ok(RegistryOutcome {
                registry: self.build()?,
                failures: Vec::new(),
            }),
            LoadPolicy::CollectErrors => self.build_collecting(),
        }
    }

    fn locate(&self) -> ImportResult<Vec<String>> {
        let unit_names = UnitLocator::new(self.discovery.clone())?.locate()?;

        let mut seen = HashSet::new();
        for name in &unit_names {
            if !seen.insert(name.as_str()) {
                log::warn!("Unit name '{}' appears more than once", name);
            }
        }
        Ok(unit_names)
    }

    fn process_unit(&self, unit_name: &str) -> ImportResult<Vec<Component>> {
        let unit_path = self.discovery.unit_path(unit_name);
        let module = Rc::new(self.loader.load(&unit_path, unit_name)?);
        let declarations = introspect(&module);

        let mut components = filter_types(&module, declarations.type_like);
        components.extend(filter_callables(&module, declarations.callable_like));
        log::debug!(
            "Unit '{}' contributed {} components",
            unit_name,
            components.len()
        );
        Ok(components)
    }
}

/// Build the registry for every unit directly under `root` (all-or-nothing)
pub fn register(root: &Path) -> ImportResult<ComponentRegistry> {
    RegistryBuilder::new(DiscoveryConfig::with_root(root)).build()
}

/// Build the registry for every unit directly under `root`, collecting unit failures
pub fn register_collecting(root: &Path) -> ImportResult<RegistryOutcome> {
    RegistryBuilder::new(DiscoveryConfig::with_root(root)).build_collecting()
}
