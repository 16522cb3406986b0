//! Configuration and process setup.

/// Tracing subscriber initialisation.
pub mod logging;
/// `ragwire.toml` loading and validation.
pub mod toml_config;
