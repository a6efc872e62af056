//! Configuration loading
//!
//! This module provides utilities for loading the connector configuration
//! from environment variables and files.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
