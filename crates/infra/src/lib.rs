//! # Fishbowl Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The reqwest HTTP transport
//! - Configuration loading from the environment and files
//! - The file-backed poll cursor store
//! - [`FishbowlConnector`], which wires everything together
//!
//! ## Architecture
//! - Implements traits defined in `fishbowl-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod connector;
pub mod errors;
pub mod http;
pub mod poll_state;

pub use connector::FishbowlConnector;
pub use errors::InfraError;
pub use http::{ReqwestTransport, ReqwestTransportBuilder};
pub use poll_state::FilePollStateStore;
