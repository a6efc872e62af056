use std::time::Duration;

use async_trait::async_trait;
use fishbowl_core::ports::HttpTransport;
use fishbowl_domain::{FishbowlError, HttpMethod, HttpRequest, HttpResponse, HttpSettings, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;
use tracing::debug;

use crate::errors::InfraError;

/// [`HttpTransport`] over a shared reqwest client.
///
/// Every response is handed back to the core whatever its status; only
/// failures without a response become errors.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Transport configured from the `http` section of the connector config.
    pub fn from_settings(settings: &HttpSettings) -> Result<Self> {
        let mut builder = Self::builder().accept_invalid_certs(settings.accept_invalid_certs);
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &settings.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = to_reqwest_method(request.method);
        let mut builder = self.client.request(method.clone(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            debug!(%method, url = %request.url, error = %err, "http_request_failed");
            FishbowlError::from(InfraError::from(err))
        })?;

        let status = response.status().as_u16();
        debug!(%method, url = %request.url, status, "http_response_received");

        let text = response.text().await.map_err(|err| FishbowlError::from(InfraError::from(err)))?;
        Ok(HttpResponse::new(status, decode_body(&text)))
    }
}

/// Empty bodies decode to `null`; bodies that are not JSON are kept as text.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_headers: Vec<(String, String)>,
    accept_invalid_certs: bool,
}

impl ReqwestTransportBuilder {
    /// Total request timeout. Unset means no client-side timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Allow self-signed certificates, common on on-premise servers.
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    /// `Config` for an invalid header or a client that cannot be built.
    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if !self.default_headers.is_empty() {
            builder = builder.default_headers(header_map(&self.default_headers)?);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|err| FishbowlError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(ReqwestTransport { client })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| FishbowlError::Config(format!("invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            FishbowlError::Config(format!("invalid header value for {name}: {err}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}
