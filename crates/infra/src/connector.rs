//! Connector facade
//!
//! Wires the reqwest transport, token cache, request client, action executor
//! and poller from a [`FishbowlConfig`].

use std::sync::Arc;

use fishbowl_core::ports::{HttpTransport, PollStateStore, StaticCredentialProvider};
use fishbowl_core::{
    ActionExecutor, Authenticator, Clock, ExecuteOptions, FishbowlClient, MemoryPollStateStore,
    PollMode, PollOptions, Poller, SystemClock, TokenCache,
};
use fishbowl_domain::{FishbowlConfig, Record, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::http::ReqwestTransport;
use crate::poll_state::FilePollStateStore;

/// Entry point for hosts: credential test, actions and polling over one
/// shared client.
pub struct FishbowlConnector {
    config: FishbowlConfig,
    client: FishbowlClient,
    executor: ActionExecutor,
    poller: Poller,
}

impl FishbowlConnector {
    /// Connector using reqwest and the process-wide token cache.
    ///
    /// # Errors
    /// Returns `FishbowlError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: FishbowlConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::from_settings(&config.http)?);
        Ok(Self::with_transport(config, transport, TokenCache::shared(), Arc::new(SystemClock)))
    }

    /// Connector over an explicit transport, token cache and clock.
    pub fn with_transport(
        config: FishbowlConfig,
        transport: Arc<dyn HttpTransport>,
        cache: Arc<TokenCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let authenticator = Arc::new(Authenticator::new(transport.clone(), cache));
        let credentials = Arc::new(StaticCredentialProvider::new(config.credential.clone()));
        let client = FishbowlClient::new(transport, credentials, authenticator);

        let store: Arc<dyn PollStateStore> = match &config.poll.state_path {
            Some(path) => Arc::new(FilePollStateStore::new(path)),
            None => Arc::new(MemoryPollStateStore::new()),
        };

        info!(server = %config.credential.base_url(), "fishbowl_connector_ready");
        Self {
            executor: ActionExecutor::new(client.clone()),
            poller: Poller::new(client.clone(), store, clock),
            client,
            config,
        }
    }

    /// Configuration the connector was built from.
    pub fn config(&self) -> &FishbowlConfig {
        &self.config
    }

    /// Shared request client.
    pub fn client(&self) -> &FishbowlClient {
        &self.client
    }

    /// Log in once without caching the token.
    pub async fn test_credentials(&self) -> Result<()> {
        self.client.authenticator().test_credentials(&self.config.credential).await
    }

    /// Run one action; see [`ActionExecutor::execute`].
    pub async fn execute(
        &self,
        resource: &str,
        operation: &str,
        params: &Record,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>> {
        self.executor.execute(resource, operation, params, cancel).await
    }

    /// Run one action per item; see [`ActionExecutor::execute_batch`].
    pub async fn execute_batch(
        &self,
        resource: &str,
        operation: &str,
        items: &[Record],
        options: ExecuteOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>> {
        self.executor.execute_batch(resource, operation, items, options, cancel).await
    }

    /// Poll one trigger event; see [`Poller::poll`].
    pub async fn poll(
        &self,
        event: &str,
        options: &PollOptions,
        mode: PollMode,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Record>>> {
        self.poller.poll(event, options, mode, cancel).await
    }
}
