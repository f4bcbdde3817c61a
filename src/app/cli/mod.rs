//! Command-line surface: arguments, layered configuration and output rendering

pub mod args;
pub mod config;
pub mod display;
