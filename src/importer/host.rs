//! Host vocabulary registered into every unit engine
//!
//! Units describe their exports through a small closed set of tagged values
//! instead of being reflected upon:
//!
//! - `blueprint(#{ op: |s| ... })` declares a type-like blueprint
//! - `required()` marks a blueprint operation that still has to be supplied
//! - `abstract_base()` is the pure abstraction every blueprint may extend
//! - `placeholder()` marks a callable that must be overridden before use
//!
//! The remaining functions give a unit access to its own identity and to the
//! ambient process environment. The environment is shared by every unit in a
//! run; nothing here isolates one unit's side effects from another's.

use rhai::{Dynamic, Engine, EvalAltResult, FnPtr, Map, Position};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Log target for output produced by unit code
pub const UNIT_LOG_TARGET: &str = "unit";

/// Name of the optional blueprint operation run during construction
pub const INIT_OPERATION: &str = "init";

/// One operation slot of a blueprint
#[derive(Debug, Clone)]
pub enum Slot {
    /// Implemented operation
    Method(FnPtr),
    /// Operation that must be supplied by an extending blueprint
    Required,
}

/// Type-like declaration: a constructible set of operations plus initial fields
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    slots: BTreeMap<String, Slot>,
    fields: Map,
    abstract_base: bool,
}

/// Marker value for a blueprint operation with no implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredOp;

/// Marker value for a callable that must be overridden before it can be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder;

impl Blueprint {
    /// Build a blueprint from a map of operation name to function pointer or `required()`
    pub fn from_parts(methods: Map, fields: Map) -> Result<Self, Box<EvalAltResult>> {
        let slots = methods
            .into_iter()
            .map(|(name, value)| Ok((name.to_string(), Slot::from_value(&name, value)?)))
            .collect::<Result<BTreeMap<_, _>, Box<EvalAltResult>>>()?;

        Ok(Self {
            slots,
            fields,
            abstract_base: false,
        })
    }

    /// The pure abstraction marker
    pub fn abstract_base() -> Self {
        Self {
            abstract_base: true,
            ..Self::default()
        }
    }

    /// Derive a blueprint, overriding or adding operations.
    /// The abstract-base marker is not inherited; required slots are until overridden.
    pub fn extend(&self, methods: Map) -> Result<Self, Box<EvalAltResult>> {
        let mut derived = Self {
            slots: self.slots.clone(),
            fields: self.fields.clone(),
            abstract_base: false,
        };
        for (name, value) in methods {
            let slot = Slot::from_value(&name, value)?;
            derived.slots.insert(name.to_string(), slot);
        }
        Ok(derived)
    }

    pub fn is_abstract_base(&self) -> bool {
        self.abstract_base
    }

    /// Abstract blueprints cannot be instantiated
    pub fn is_abstract(&self) -> bool {
        self.abstract_base || self.slots.values().any(|s| matches!(s, Slot::Required))
    }

    /// Names of operations still marked `required()`
    pub fn required_operations(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Required))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Implemented operation by name
    pub fn method(&self, name: &str) -> Option<&FnPtr> {
        match self.slots.get(name) {
            Some(Slot::Method(ptr)) => Some(ptr),
            _ => None,
        }
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Initial instance state
    pub fn fields(&self) -> &Map {
        &self.fields
    }
}

impl Slot {
    fn from_value(name: &str, value: Dynamic) -> Result<Self, Box<EvalAltResult>> {
        if value.is::<RequiredOp>() {
            return Ok(Slot::Required);
        }
        let type_name = value.type_name();
        value.try_cast::<FnPtr>().map(Slot::Method).ok_or_else(|| {
            runtime_error(format!(
                "blueprint operation '{}' must be a function pointer or required(), found {}",
                name, type_name
            ))
        })
    }
}

/// Identity of the unit an engine is loading
#[derive(Debug, Clone)]
pub struct UnitIdentity {
    pub name: String,
    pub path: PathBuf,
}

/// Register the unit-facing vocabulary into a freshly created engine
pub fn register_vocabulary(engine: &mut Engine, unit: &UnitIdentity) {
    engine
        .register_type_with_name::<Blueprint>("Blueprint")
        .register_type_with_name::<RequiredOp>("RequiredOp")
        .register_type_with_name::<Placeholder>("Placeholder");

    engine.register_fn("blueprint", |methods: Map| {
        Blueprint::from_parts(methods, Map::new())
    });
    engine.register_fn("blueprint", |methods: Map, fields: Map| {
        Blueprint::from_parts(methods, fields)
    });
    engine.register_fn("extend", |base: Blueprint, methods: Map| base.extend(methods));
    engine.register_fn("required", || RequiredOp);
    engine.register_fn("abstract_base", Blueprint::abstract_base);
    engine.register_fn("placeholder", || Placeholder);
    engine.register_get("is_abstract", |blueprint: &mut Blueprint| {
        blueprint.is_abstract()
    });

    let name = unit.name.clone();
    engine.register_fn("unit_name", move || name.clone());
    let path = unit.path.to_string_lossy().into_owned();
    engine.register_fn("unit_path", move || path.clone());
    engine.register_fn("host_api_version", || {
        crate::core::version::get_host_api_version() as rhai::INT
    });

    engine.register_fn("env", |key: &str| {
        std::env::var(key).map(Dynamic::from).unwrap_or(Dynamic::UNIT)
    });
    engine.register_fn("set_env", |key: &str, value: &str| {
        std::env::set_var(key, value);
    });

    let print_name = unit.name.clone();
    engine.on_print(move |text| {
        log::info!(target: UNIT_LOG_TARGET, "[{}] {}", print_name, text);
    });
    let debug_name = unit.name.clone();
    engine.on_debug(move |text, _source, pos| {
        log::debug!(target: UNIT_LOG_TARGET, "[{}] {} ({})", debug_name, text, pos);
    });
}

pub(crate) fn runtime_error(message: impl Into<String>) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(message.into().into(), Position::NONE).into()
}
