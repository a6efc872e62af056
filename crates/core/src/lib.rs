//! # Fishbowl Core
//!
//! Connector logic for the Fishbowl Inventory REST API - no transport code.
//!
//! This crate contains:
//! - Token cache and login flow
//! - Request client with one re-authentication retry on 401
//! - Pagination and response envelope handling
//! - Resource mappers and the action executor
//! - Polling trigger
//!
//! ## Architecture Principles
//! - Only depends on `fishbowl-domain`
//! - HTTP, credentials and cursor storage arrive through [`ports`]
//! - Time is read through [`time::Clock`]

pub mod actions;
pub mod auth;
pub mod client;
pub mod envelope;
pub mod pagination;
pub mod ports;
pub mod resources;
pub mod testing;
pub mod time;
pub mod trigger;

pub use actions::{ActionExecutor, ExecuteOptions};
pub use auth::{Authenticator, TokenCache};
pub use client::FishbowlClient;
pub use envelope::Extract;
pub use ports::{CredentialProvider, HttpTransport, PollStateStore, StaticCredentialProvider};
pub use resources::{ApiCall, Resource};
pub use time::{Clock, MockClock, SystemClock};
pub use trigger::{cursor_key, MemoryPollStateStore, PollEvent, PollMode, PollOptions, Poller};
