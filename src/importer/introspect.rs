//! Declaration Introspection
//!
//! Partitions the visible top-level declarations of a loaded unit by shape.
//! Units tag their exports explicitly through the host vocabulary, so
//! classification is a matter of reading those tags:
//!
//! | Declaration                        | Bucket          |
//! |------------------------------------|-----------------|
//! | exported `Blueprint`               | type-like       |
//! | exported function pointer/closure  | callable-like   |
//! | exported `placeholder()`           | callable-like   |
//! | public named `fn`                  | callable-like   |
//! | any other exported value           | neither (dropped) |
//!
//! Private functions, anonymous function bodies and variables that are not
//! exported are not part of a unit's visible surface.

use crate::importer::host::{Blueprint, Placeholder};
use crate::importer::loader::ModuleHandle;
use rhai::FnPtr;

/// Raw type-like declaration
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    pub blueprint: Blueprint,
}

/// Raw callable-like declaration
#[derive(Debug, Clone)]
pub struct CallableDeclaration {
    pub name: String,
    pub target: CallableTarget,
}

/// What a callable-like declaration refers to
#[derive(Debug, Clone)]
pub enum CallableTarget {
    /// Public named script function
    Function,
    /// Exported function pointer or closure
    Pointer(FnPtr),
    /// The "must be overridden" marker
    Placeholder,
}

/// Classified view of one unit's declarations
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub type_like: Vec<TypeDeclaration>,
    pub callable_like: Vec<CallableDeclaration>,
    /// Names inspected but belonging to neither bucket
    pub ignored: Vec<String>,
}

impl Declarations {
    /// Number of names inspected
    pub fn inspected(&self) -> usize {
        self.type_like.len() + self.callable_like.len() + self.ignored.len()
    }
}

/// Partition a unit's visible declarations into type-like and callable-like buckets.
/// Each bucket is ordered by declaration name.
pub fn introspect(module: &ModuleHandle) -> Declarations {
    let mut declarations = Declarations::default();

    for (name, value) in module.exported_values() {
        if let Some(blueprint) = value.clone().try_cast::<Blueprint>() {
            declarations.type_like.push(TypeDeclaration {
                name: name.to_string(),
                blueprint,
            });
        } else if value.is::<Placeholder>() {
            declarations.callable_like.push(CallableDeclaration {
                name: name.to_string(),
                target: CallableTarget::Placeholder,
            });
        } else if let Some(pointer) = value.clone().try_cast::<FnPtr>() {
            declarations.callable_like.push(CallableDeclaration {
                name: name.to_string(),
                target: CallableTarget::Pointer(pointer),
            });
        } else {
            log::trace!(
                "Ignoring '{}' in unit '{}' ({})",
                name,
                module.unit_name(),
                value.type_name()
            );
            declarations.ignored.push(name.to_string());
        }
    }

    for name in module.public_functions().into_keys() {
        // Rhai keeps variables and functions in separate namespaces; an export
        // already classified under the same name wins so each name is seen once
        if declarations.callable_like.iter().any(|c| c.name == name)
            || declarations.type_like.iter().any(|t| t.name == name)
            || declarations.ignored.contains(&name)
        {
            log::debug!(
                "Function '{}' in unit '{}' is shadowed by an export of the same name",
                name,
                module.unit_name()
            );
            continue;
        }
        declarations.callable_like.push(CallableDeclaration {
            name,
            target: CallableTarget::Function,
        });
    }

    declarations.type_like.sort_by(|a, b| a.name.cmp(&b.name));
    declarations.callable_like.sort_by(|a, b| a.name.cmp(&b.name));
    declarations.ignored.sort();

    log::debug!(
        "Unit '{}': {} type-like, {} callable-like, {} ignored",
        module.unit_name(),
        declarations.type_like.len(),
        declarations.callable_like.len(),
        declarations.ignored.len()
    );
    declarations
}
