pub mod app;
pub mod conformance;
pub mod core;
pub mod importer;

pub use crate::core::version::get_host_api_version;
