//! HTTP value types exchanged between the core and the transport port

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object. The unit of request bodies, query maps and action output.
pub type Record = serde_json::Map<String, Value>;

/// HTTP verbs used by the Fishbowl API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call against the Fishbowl REST API, relative to `/api`.
///
/// `endpoint` may already carry a query string (`/part?number=A100`); the
/// `query` map is appended to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub endpoint: String,
    pub body: Record,
    pub query: Record,
}

impl RequestDescriptor {
    /// Request for `endpoint` with an empty query and body.
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self { method, endpoint: endpoint.into(), body: Record::new(), query: Record::new() }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    #[must_use]
    pub fn with_body(mut self, body: Record) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Record) -> Self {
        self.query = query;
        self
    }
}

/// Fully resolved request handed to the HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Request for an absolute URL.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), query: Vec::new(), body: None }
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and decoded body of an upstream response.
///
/// Empty bodies decode to `Value::Null`; non-JSON bodies are kept as
/// `Value::String`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    /// Response with `status` and a decoded body.
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is 2xx.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
