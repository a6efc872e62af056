//! Connector configuration structures

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Credential;

/// Top-level configuration loaded from the environment or a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishbowlConfig {
    pub credential: Credential,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub poll: PollSettings,
}

impl FishbowlConfig {
    /// Config with default HTTP and poll settings.
    pub fn new(credential: Credential) -> Self {
        Self { credential, http: HttpSettings::default(), poll: PollSettings::default() }
    }
}

/// Transport settings. No timeout is applied unless one is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// On-premise Fishbowl servers commonly run with self-signed
    /// certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl HttpSettings {
    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Polling trigger settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    /// JSON file holding poll cursors; in-memory when unset.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}
