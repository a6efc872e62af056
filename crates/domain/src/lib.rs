//! # Fishbowl Domain
//!
//! Domain types and pure helpers for the Fishbowl Inventory connector.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Credentials and HTTP value types
//! - Configuration structures
//! - Payload builders and date/object helpers
//!
//! ## Architecture
//! - No dependencies on other connector crates
//! - Only external dependencies allowed
//! - Pure data structures and functions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
