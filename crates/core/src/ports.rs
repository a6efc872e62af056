//! Port interfaces implemented by the infrastructure layer

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fishbowl_domain::{Credential, HttpRequest, HttpResponse, Result};

/// Sends one HTTP request.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status, and `Err(FishbowlError::UpstreamApi { status: None, .. })`
/// when no response was received.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Supplies the credential for the current call.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> Result<Credential>;
}

/// Persists the `lastPollTime` cursor per trigger key.
#[async_trait]
pub trait PollStateStore: Send + Sync {
    async fn last_poll_time(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    async fn set_last_poll_time(&self, key: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Credential provider that always returns the same credential.
#[derive(Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Provider that always returns `credential`.
    pub const fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credential(&self) -> Result<Credential> {
        Ok(self.credential.clone())
    }
}
