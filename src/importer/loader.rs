//! Unit Loader
//!
//! Compiles and evaluates one unit in a freshly created engine and scope, and
//! returns the resulting namespace as an owned [`ModuleHandle`]. Nothing is
//! shared between two loads: identically named declarations in different units
//! live in different handles.

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::host::{self, UnitIdentity};
use rhai::{CallFnOptions, Dynamic, Engine, EvalAltResult, FnAccess, FnPtr, Module, Scope, AST};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Anonymous functions and closures are compiled under names with this prefix
const ANONYMOUS_FN_PREFIX: &str = "anon$";

/// Options applied to every engine the loader creates
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderOptions {
    /// Upper bound on operations per evaluation or call (0 = unlimited)
    pub max_operations: u64,
}

/// Declared shape of a script function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<String>,
    pub public: bool,
}

impl FunctionSignature {
    pub fn is_anonymous(&self) -> bool {
        self.name.starts_with(ANONYMOUS_FN_PREFIX)
    }
}

/// Isolated namespace produced by loading one unit
pub struct ModuleHandle {
    unit_name: String,
    unit_path: PathBuf,
    engine: Engine,
    ast: AST,
    module: Module,
}

impl std::fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("unit_name", &self.unit_name)
            .field("unit_path", &self.unit_path)
            .field(
                "exports",
                &self.module.iter_var().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ModuleHandle {
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn unit_path(&self) -> &Path {
        &self.unit_path
    }

    /// Exported top-level bindings, ordered by name
    pub fn exported_values(&self) -> impl Iterator<Item = (&str, &Dynamic)> {
        self.module.iter_var()
    }

    /// Every script function in the unit, including private and anonymous ones
    pub fn functions(&self) -> Vec<FunctionSignature> {
        self.ast
            .iter_functions()
            .map(|meta| FunctionSignature {
                name: meta.name.to_string(),
                params: meta.params.iter().map(|p| p.to_string()).collect(),
                public: matches!(meta.access, FnAccess::Public),
            })
            .collect()
    }

    /// Public named functions grouped by name; overloads share one entry
    pub fn public_functions(&self) -> BTreeMap<String, Vec<FunctionSignature>> {
        let mut grouped: BTreeMap<String, Vec<FunctionSignature>> = BTreeMap::new();
        for signature in self.functions() {
            if signature.public && !signature.is_anonymous() {
                grouped
                    .entry(signature.name.clone())
                    .or_default()
                    .push(signature);
            }
        }
        grouped
    }

    /// Parameter lists of every overload of a function
    pub fn parameter_lists(&self, fn_name: &str) -> Vec<Vec<String>> {
        self.functions()
            .into_iter()
            .filter(|signature| signature.name == fn_name)
            .map(|signature| signature.params)
            .collect()
    }

    /// Call a function by name without re-running the unit's top-level code
    ///
    /// Public script functions resolve through the evaluated module, whose
    /// functions carry the unit's constants (`global::NAME`). Anything else,
    /// private helpers and host functions, resolves through the AST and then
    /// the engine's global namespace.
    pub fn call_function(
        &self,
        fn_name: &str,
        args: Vec<Dynamic>,
        this: Option<&mut Dynamic>,
    ) -> Result<Dynamic, Box<EvalAltResult>> {
        let mut options = CallFnOptions::new()
            .eval_ast(false)
            .rewind_scope(true)
            .in_all_namespaces(true);
        if let Some(this) = this {
            options = options.bind_this_ptr(this);
        }
        let mut scope = Scope::new();
        if self.module.get_script_fn(fn_name, args.len()).is_some() {
            self.engine
                .call_fn_with_options::<Dynamic>(options, &mut scope, &AST::empty(), fn_name, args)
        } else {
            self.engine
                .call_fn_with_options::<Dynamic>(options, &mut scope, &self.ast, fn_name, args)
        }
    }

    /// Call through a function pointer, passing curried captures first
    pub fn call_pointer(
        &self,
        pointer: &FnPtr,
        args: Vec<Dynamic>,
        this: Option<&mut Dynamic>,
    ) -> Result<Dynamic, Box<EvalAltResult>> {
        let mut full_args = pointer.curry().to_vec();
        full_args.extend(args);
        self.call_function(pointer.fn_name(), full_args, this)
    }
}

/// Loads units into isolated namespaces
#[derive(Debug, Clone, Default)]
pub struct UnitLoader {
    options: LoaderOptions,
}

impl UnitLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Execute the unit at `unit_path` under `logical_name` and return its namespace
    pub fn load(&self, unit_path: &Path, logical_name: &str) -> ImportResult<ModuleHandle> {
        let load_error = |cause: String| ImportError::UnitLoad {
            unit_name: logical_name.to_string(),
            unit_path: unit_path.to_path_buf(),
            cause,
        };

        let source = std::fs::read_to_string(unit_path)
            .map_err(|e| load_error(format!("cannot read unit: {}", e)))?;

        let mut engine = Engine::new();
        if self.options.max_operations > 0 {
            engine.set_max_operations(self.options.max_operations);
        }
        host::register_vocabulary(
            &mut engine,
            &UnitIdentity {
                name: logical_name.to_string(),
                path: unit_path.to_path_buf(),
            },
        );

        let mut ast = engine
            .compile(&source)
            .map_err(|e| load_error(format!("parse error: {}", e)))?;
        ast.set_source(logical_name);

        log::debug!("Evaluating unit '{}' ({})", logical_name, unit_path.display());
        let module = Module::eval_ast_as_new(Scope::new(), &ast, &engine)
            .map_err(|e| load_error(format!("initialisation failed: {}", e)))?;
        engine.register_global_module(module.clone().into());

        Ok(ModuleHandle {
            unit_name: logical_name.to_string(),
            unit_path: unit_path.to_path_buf(),
            engine,
            ast,
            module,
        })
    }
}

/// Load a unit with default options
pub fn load(unit_path: &Path, logical_name: &str) -> ImportResult<ModuleHandle> {
    UnitLoader::default().load(unit_path, logical_name)
}
