//! Public API for the import pipeline
//!
//! External modules should import from here rather than directly from the
//! internal pipeline stages.

// Pipeline entry points
pub use crate::importer::registry::{
    register, register_collecting, ComponentRegistry, LoadPolicy, RegistryBuilder,
    RegistryOutcome, UnitFailure,
};

// Individual stages
pub use crate::importer::discovery::{locate, DiscoveryConfig, UnitLocator, DEFAULT_UNIT_DIR};
pub use crate::importer::filter::{filter_callables, filter_types};
pub use crate::importer::introspect::{
    introspect, CallableDeclaration, CallableTarget, Declarations, TypeDeclaration,
};
pub use crate::importer::loader::{load, FunctionSignature, LoaderOptions, ModuleHandle, UnitLoader};

// Components and the unit vocabulary
pub use crate::importer::host::{Blueprint, Placeholder, RequiredOp, Slot, UNIT_LOG_TARGET};
pub use crate::importer::types::{
    Component, ComponentHandle, ComponentKind, ComponentSummary, Instance,
};

// Error handling
pub use crate::importer::error::{ImportError, ImportResult};
