//! Fishbowl account credential

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_APP_ID, DEFAULT_APP_NAME, DEFAULT_PORT};

/// Credentials and app identity used to log in to a Fishbowl server.
///
/// Immutable for the lifetime of a call. The password is redacted from
/// `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub server_url: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_id")]
    pub app_id: u32,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

const fn default_app_id() -> u32 {
    DEFAULT_APP_ID
}

impl Credential {
    /// Credential with the default port and app identity.
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            port: None,
            username: username.into(),
            password: password.into(),
            app_name: default_app_name(),
            app_id: DEFAULT_APP_ID,
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Override the app name and id sent at login.
    #[must_use]
    pub fn with_app(mut self, app_name: impl Into<String>, app_id: u32) -> Self {
        self.app_name = app_name.into();
        self.app_id = app_id;
        self
    }

    /// Port to connect to; absent or zero falls back to 443.
    pub fn effective_port(&self) -> u16 {
        self.port.filter(|port| *port != 0).unwrap_or(DEFAULT_PORT)
    }

    /// `{serverUrl}:{port}` with a single trailing slash removed from the URL.
    pub fn base_url(&self) -> String {
        let server = self.server_url.strip_suffix('/').unwrap_or(&self.server_url);
        format!("{server}:{}", self.effective_port())
    }

    /// Token cache fingerprint: server, port and username.
    ///
    /// Not a secret; only used to coalesce tokens per account.
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.server_url, self.effective_port(), self.username)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("server_url", &self.server_url)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_name", &self.app_name)
            .field("app_id", &self.app_id)
            .finish()
    }
}
