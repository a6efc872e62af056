//! Exchanges credentials for a bearer token via `/api/login`

use std::sync::Arc;
use std::time::Duration;

use fishbowl_domain::constants::{
    APP_DESCRIPTION, CREDENTIAL_TEST_APP_DESCRIPTION, LOGIN_PATH, NO_TOKEN_MESSAGE, TOKEN_TTL,
};
use fishbowl_domain::{Credential, FishbowlError, HttpMethod, HttpRequest, Result};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::token_cache::TokenCache;
use crate::ports::HttpTransport;

/// Logs in to Fishbowl and keeps the resulting token in a [`TokenCache`].
///
/// Login failures are never retried here; the request client decides when
/// a fresh login is warranted.
pub struct Authenticator {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<TokenCache>,
    ttl: Duration,
}

impl Authenticator {
    /// Authenticator with the default token TTL.
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<TokenCache>) -> Self {
        Self { transport, cache, ttl: TOKEN_TTL }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cache the tokens are stored in.
    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Cached token for `credential`, logging in on a miss.
    pub async fn token(&self, credential: &Credential) -> Result<String> {
        let key = credential.cache_key();
        if let Some(token) = self.cache.get(&key) {
            debug!(cache_key = %key, "token_cache_hit");
            return Ok(token);
        }
        self.authenticate(credential).await
    }

    /// Log in unconditionally and overwrite the cached token.
    #[instrument(
        skip(self, credential),
        fields(server = %credential.server_url, username = %credential.username)
    )]
    pub async fn authenticate(&self, credential: &Credential) -> Result<String> {
        let token = self.login(credential, APP_DESCRIPTION).await?;
        self.cache.set(&credential.cache_key(), token.clone(), self.ttl);
        info!(ttl_secs = self.ttl.as_secs(), "fishbowl_login_succeeded");
        Ok(token)
    }

    /// Drop the cached token so the next call logs in again.
    pub fn invalidate(&self, credential: &Credential) {
        self.cache.invalidate(&credential.cache_key());
    }

    /// Validate credentials with a one-off login that does not touch the
    /// cache.
    #[instrument(
        skip(self, credential),
        fields(server = %credential.server_url, username = %credential.username)
    )]
    pub async fn test_credentials(&self, credential: &Credential) -> Result<()> {
        self.login(credential, CREDENTIAL_TEST_APP_DESCRIPTION).await?;
        info!("fishbowl_credentials_valid");
        Ok(())
    }

    async fn login(&self, credential: &Credential, app_description: &str) -> Result<String> {
        let url = format!("{}{LOGIN_PATH}", credential.base_url());
        let request = HttpRequest::new(HttpMethod::Post, url)
            .header("Content-Type", "application/json")
            .json(json!({
                "appName": credential.app_name,
                "appDescription": app_description,
                "appId": credential.app_id,
                "username": credential.username,
                "password": credential.password,
            }));

        let response = self.transport.send(request).await.map_err(|err| {
            warn!(error = %err, "fishbowl_login_transport_failed");
            match err {
                FishbowlError::Cancelled => FishbowlError::Cancelled,
                other => FishbowlError::Authentication(format!("Failed to authenticate: {other}")),
            }
        })?;

        if !response.is_success() {
            warn!(status = response.status, "fishbowl_login_rejected");
            return Err(FishbowlError::Authentication(format!(
                "Failed to authenticate: login returned status {}{}",
                response.status,
                detail_suffix(&response.body)
            )));
        }

        match response.body.get("token") {
            Some(Value::String(token)) if !token.is_empty() => Ok(token.clone()),
            _ => Err(FishbowlError::Authentication(NO_TOKEN_MESSAGE.to_string())),
        }
    }
}

fn detail_suffix(body: &Value) -> String {
    crate::client::upstream_message(body).map(|message| format!(": {message}")).unwrap_or_default()
}
