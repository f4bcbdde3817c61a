//! Type definitions for the component registry
//!
//! A [`Component`] is one declaration that survived filtering, tagged with the
//! unit it came from and the invocation convention that applies to it.

use crate::importer::host::{Blueprint, INIT_OPERATION};
use crate::importer::loader::ModuleHandle;
use rhai::{Dynamic, EvalAltResult, FnPtr};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Invocation convention of a component
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentKind {
    /// Constructed with zero arguments, then the contract method is called
    Type,
    /// Invoked directly
    Callable,
}

/// Invocable reference into a loaded unit.
///
/// Every variant keeps the unit's namespace alive for as long as the handle exists.
#[derive(Clone)]
pub enum ComponentHandle {
    /// Concrete blueprint
    Blueprint {
        module: Rc<ModuleHandle>,
        blueprint: Blueprint,
    },
    /// Named public script function
    Function { module: Rc<ModuleHandle>, name: String },
    /// Exported function pointer or closure
    Pointer { module: Rc<ModuleHandle>, pointer: FnPtr },
}

impl ComponentHandle {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentHandle::Blueprint { .. } => ComponentKind::Type,
            ComponentHandle::Function { .. } | ComponentHandle::Pointer { .. } => {
                ComponentKind::Callable
            }
        }
    }

    pub fn module(&self) -> &Rc<ModuleHandle> {
        match self {
            ComponentHandle::Blueprint { module, .. }
            | ComponentHandle::Function { module, .. }
            | ComponentHandle::Pointer { module, .. } => module,
        }
    }
}

/// Surviving, classified declaration held in the registry
#[derive(Clone)]
pub struct Component {
    unit_name: String,
    unit_path: PathBuf,
    declaration: String,
    handle: ComponentHandle,
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("unit_name", &self.unit_name)
            .field("unit_path", &self.unit_path)
            .field("declaration", &self.declaration)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Serializable summary of a component's origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    pub unit_name: String,
    pub unit_path: PathBuf,
    pub declaration: String,
    pub kind: ComponentKind,
}

impl Component {
    pub(crate) fn new(declaration: impl Into<String>, handle: ComponentHandle) -> Self {
        let module = handle.module();
        Self {
            unit_name: module.unit_name().to_string(),
            unit_path: module.unit_path().to_path_buf(),
            declaration: declaration.into(),
            handle,
        }
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn unit_path(&self) -> &Path {
        &self.unit_path
    }

    /// Top-level name the declaration is bound under in its unit
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn kind(&self) -> ComponentKind {
        self.handle.kind()
    }

    pub fn handle(&self) -> &ComponentHandle {
        &self.handle
    }

    pub fn summary(&self) -> ComponentSummary {
        ComponentSummary {
            unit_name: self.unit_name.clone(),
            unit_path: self.unit_path.clone(),
            declaration: self.declaration.clone(),
            kind: self.kind(),
        }
    }

    /// Declared parameters of the target invoked for `operation`, excluding curried captures.
    ///
    /// Callables ignore `operation`. `None` means the target is not a script function
    /// or the operation does not exist.
    pub fn parameter_lists(&self, operation: &str) -> Option<Vec<Vec<String>>> {
        let pointer_params = |module: &ModuleHandle, pointer: &FnPtr| {
            let curried = pointer.curry().len();
            let lists: Vec<Vec<String>> = module
                .parameter_lists(pointer.fn_name())
                .into_iter()
                .filter(|params| params.len() >= curried)
                .map(|params| params[curried..].to_vec())
                .collect();
            (!lists.is_empty()).then_some(lists)
        };

        match &self.handle {
            ComponentHandle::Blueprint { module, blueprint } => {
                pointer_params(module, blueprint.method(operation)?)
            }
            ComponentHandle::Function { module, name } => {
                let lists = module.parameter_lists(name);
                (!lists.is_empty()).then_some(lists)
            }
            ComponentHandle::Pointer { module, pointer } => pointer_params(module, pointer),
        }
    }

    /// Zero-argument construction of a TYPE component
    pub fn construct(&self) -> Result<Instance, Box<EvalAltResult>> {
        let ComponentHandle::Blueprint { module, blueprint } = &self.handle else {
            return Err(crate::importer::host::runtime_error(format!(
                "'{}' is a {} component and cannot be constructed",
                self.declaration,
                self.kind()
            )));
        };

        let mut instance = Instance {
            module: Rc::clone(module),
            blueprint: blueprint.clone(),
            state: Dynamic::from_map(blueprint.fields().clone()),
        };
        if blueprint.method(INIT_OPERATION).is_some() {
            instance.call(INIT_OPERATION, Vec::new())?;
        }
        Ok(instance)
    }

    /// Direct invocation of a CALLABLE component
    pub fn call(&self, args: Vec<Dynamic>) -> Result<Dynamic, Box<EvalAltResult>> {
        match &self.handle {
            ComponentHandle::Function { module, name } => module.call_function(name, args, None),
            ComponentHandle::Pointer { module, pointer } => {
                module.call_pointer(pointer, args, None)
            }
            ComponentHandle::Blueprint { .. } => Err(crate::importer::host::runtime_error(
                format!("'{}' is a TYPE component; construct it first", self.declaration),
            )),
        }
    }
}

/// Constructed instance of a TYPE component
pub struct Instance {
    module: Rc<ModuleHandle>,
    blueprint: Blueprint,
    state: Dynamic,
}

impl Instance {
    /// Call an operation with `this` bound to the instance state
    pub fn call(&mut self, operation: &str, args: Vec<Dynamic>) -> Result<Dynamic, Box<EvalAltResult>> {
        let pointer = self.blueprint.method(operation).ok_or_else(|| {
            crate::importer::host::runtime_error(format!("no operation named '{}'", operation))
        })?;
        self.module.call_pointer(pointer, args, Some(&mut self.state))
    }

    /// Current instance state
    pub fn state(&self) -> &Dynamic {
        &self.state
    }
}
