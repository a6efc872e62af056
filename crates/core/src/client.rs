//! Authenticated request client
//!
//! Issues one call against `{base}/api{endpoint}` with a bearer token. A 401
//! invalidates the cached token, forces one fresh login and retries the call
//! exactly once; every other failure surfaces immediately.

use std::sync::Arc;

use fishbowl_domain::constants::API_PREFIX;
use fishbowl_domain::utils::query_pairs;
use fishbowl_domain::{
    Credential, FishbowlError, HttpRequest, HttpResponse, RequestDescriptor, Result,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::auth::Authenticator;
use crate::ports::{CredentialProvider, HttpTransport};

const UNAUTHORIZED: u16 = 401;

/// Request client shared by the action executor, paginator and poller.
///
/// Cheap to clone; clones share the transport, credential provider and
/// token cache.
#[derive(Clone)]
pub struct FishbowlClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialProvider>,
    authenticator: Arc<Authenticator>,
    cancel: Option<CancellationToken>,
}

impl FishbowlClient {
    /// Client over the given ports; no cancellation.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialProvider>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self { transport, credentials, authenticator, cancel: None }
    }

    /// Clone of this client whose calls abort when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self { cancel: Some(token), ..self.clone() }
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.authenticator
    }

    /// Credential for the next call.
    pub async fn credential(&self) -> Result<Credential> {
        self.credentials.credential().await
    }

    /// Send one request and return the decoded response body.
    ///
    /// # Errors
    /// - `Authentication` if no token can be obtained
    /// - `UpstreamApi` for non-2xx responses (including a 401 after the
    ///   retry) and transport failures
    /// - `Cancelled` if the client's cancellation token fires
    #[instrument(
        skip(self, request),
        fields(request_id = %Uuid::new_v4(), method = %request.method, endpoint = %request.endpoint)
    )]
    pub async fn request(&self, request: &RequestDescriptor) -> Result<Value> {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    warn!("fishbowl_request_cancelled");
                    Err(FishbowlError::Cancelled)
                }
                result = self.request_with_retry(request) => result,
            },
            None => self.request_with_retry(request).await,
        }
    }

    async fn request_with_retry(&self, request: &RequestDescriptor) -> Result<Value> {
        let credential = self.credentials.credential().await?;
        let token = self.authenticator.token(&credential).await?;

        let response = self.send(&credential, request, &token).await?;
        if response.status != UNAUTHORIZED {
            return into_result(response);
        }

        warn!("fishbowl_token_rejected_reauthenticating");
        self.authenticator.invalidate(&credential);
        let token = self.authenticator.authenticate(&credential).await?;

        let response = self.send(&credential, request, &token).await?;
        if response.status == UNAUTHORIZED {
            warn!("fishbowl_token_rejected_after_retry");
        }
        into_result(response)
    }

    async fn send(
        &self,
        credential: &Credential,
        request: &RequestDescriptor,
        token: &str,
    ) -> Result<HttpResponse> {
        let http_request = build_http_request(credential, request, token);
        let response = self.transport.send(http_request).await?;
        debug!(status = response.status, "fishbowl_response_received");
        Ok(response)
    }
}

fn build_http_request(
    credential: &Credential,
    request: &RequestDescriptor,
    token: &str,
) -> HttpRequest {
    let url = format!("{}{API_PREFIX}{}", credential.base_url(), request.endpoint);
    let mut http_request = HttpRequest::new(request.method, url)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json");

    if !request.query.is_empty() {
        http_request.query = query_pairs(&request.query);
    }
    if !request.body.is_empty() {
        http_request.body = Some(Value::Object(request.body.clone()));
    }

    http_request
}

fn into_result(response: HttpResponse) -> Result<Value> {
    if response.is_success() {
        return Ok(response.body);
    }
    let message = upstream_message(&response.body)
        .unwrap_or_else(|| format!("Fishbowl API returned status {}", response.status));
    Err(FishbowlError::upstream(response.status, message))
}

/// Best-effort error text from a Fishbowl error body.
///
/// Checks `error.message`, `error.details`, a string `error`, `message`
/// and finally a plain-text body.
pub(crate) fn upstream_message(body: &Value) -> Option<String> {
    let non_empty = |value: Option<&Value>| {
        value.and_then(Value::as_str).filter(|text| !text.is_empty()).map(str::to_string)
    };

    let error = body.get("error");
    non_empty(error.and_then(|error| error.get("message")))
        .or_else(|| non_empty(error.and_then(|error| error.get("details"))))
        .or_else(|| non_empty(error))
        .or_else(|| non_empty(body.get("message")))
        .or_else(|| non_empty(Some(body)))
}
