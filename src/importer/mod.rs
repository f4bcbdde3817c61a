//! Unit Import Pipeline
//!
//! Discovers script units in a directory, loads each into its own namespace,
//! classifies the declarations it exports and collects the usable ones into a
//! component registry.

pub(crate) mod discovery;
pub(crate) mod error;
pub(crate) mod filter;
pub(crate) mod host;
pub(crate) mod introspect;
pub(crate) mod loader;
pub(crate) mod registry;
pub(crate) mod types;

// Public API module - the only public interface for the import pipeline
pub mod api;

#[cfg(test)]
mod tests;
