//! Connector constants
//!
//! Centralized location for protocol-level constants shared by the core and
//! infrastructure crates.

use std::time::Duration;

// Connection defaults
/// Port used when the credential leaves it unset.
pub const DEFAULT_PORT: u16 = 443;
/// Application name registered with Fishbowl at login.
pub const DEFAULT_APP_NAME: &str = "Fishbowl Connector";
/// Application id registered with Fishbowl at login.
pub const DEFAULT_APP_ID: u32 = 1234;

// Authentication
/// Login endpoint, relative to the server base URL.
pub const LOGIN_PATH: &str = "/api/login";
/// Prefix for every resource endpoint.
pub const API_PREFIX: &str = "/api";
/// App description sent on a normal login.
pub const APP_DESCRIPTION: &str = "Fishbowl workflow automation integration";
/// App description sent when testing credentials.
pub const CREDENTIAL_TEST_APP_DESCRIPTION: &str =
    "Fishbowl workflow automation integration - credential test";
/// Error text for a login response without a token.
pub const NO_TOKEN_MESSAGE: &str = "No token received from Fishbowl API";

/// Cached tokens live for 50 minutes; Fishbowl sessions last about an hour.
pub const TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

// Pagination
/// Page size for return-all listings.
pub const PAGE_SIZE: u64 = 100;
/// Item cap for listings without `returnAll`.
pub const DEFAULT_LIST_LIMIT: usize = 50;

// Polling
/// Window checked by the first poll of a trigger.
pub const DEFAULT_POLL_LOOKBACK: Duration = Duration::from_secs(60);
