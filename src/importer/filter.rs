//! Component Filtering
//!
//! Drops declarations that are not usable as-is and wraps the survivors as
//! components. A blueprint is unusable when it is the abstract base itself or
//! still has `required()` operations; a callable is unusable when it is the
//! `placeholder()` marker.

use crate::importer::introspect::{CallableDeclaration, CallableTarget, TypeDeclaration};
use crate::importer::loader::ModuleHandle;
use crate::importer::types::{Component, ComponentHandle};
use std::rc::Rc;

/// Keep concrete blueprints as TYPE components
pub fn filter_types(module: &Rc<ModuleHandle>, type_like: Vec<TypeDeclaration>) -> Vec<Component> {
    type_like
        .into_iter()
        .filter_map(|declaration| {
            if declaration.blueprint.is_abstract_base() {
                log::debug!(
                    "Excluding '{}' from '{}': abstract base",
                    declaration.name,
                    module.unit_name()
                );
                return None;
            }
            if declaration.blueprint.is_abstract() {
                log::debug!(
                    "Excluding '{}' from '{}': required operations {:?}",
                    declaration.name,
                    module.unit_name(),
                    declaration.blueprint.required_operations()
                );
                return None;
            }

            Some(Component::new(
                declaration.name,
                ComponentHandle::Blueprint {
                    module: Rc::clone(module),
                    blueprint: declaration.blueprint,
                },
            ))
        })
        .collect()
}

/// Keep implemented callables as CALLABLE components
pub fn filter_callables(
    module: &Rc<ModuleHandle>,
    callable_like: Vec<CallableDeclaration>,
) -> Vec<Component> {
    callable_like
        .into_iter()
        .filter_map(|declaration| {
            let handle = match declaration.target {
                CallableTarget::Placeholder => {
                    log::debug!(
                        "Excluding '{}' from '{}': placeholder",
                        declaration.name,
                        module.unit_name()
                    );
                    return None;
                }
                CallableTarget::Function => ComponentHandle::Function {
                    module: Rc::clone(module),
                    name: declaration.name.clone(),
                },
                CallableTarget::Pointer(pointer) => ComponentHandle::Pointer {
                    module: Rc::clone(module),
                    pointer,
                },
            };
            Some(Component::new(declaration.name, handle))
        })
        .collect()
}
