//! In-memory test doubles for the core ports
//!
//! [`ScriptedTransport`] answers requests from per-route response queues and
//! records everything it receives, so tests can assert on exact call counts
//! and headers without a network.

use std::collections::VecDeque;

use async_trait::async_trait;
use fishbowl_domain::{FishbowlError, HttpMethod, HttpRequest, HttpResponse, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::ports::HttpTransport;

struct Route {
    method: HttpMethod,
    path: String,
    replies: VecDeque<Result<HttpResponse>>,
}

/// Transport that replays scripted responses.
///
/// Responses for a route are served in the order they were added; the last
/// one repeats once the queue is drained. Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Transport with no scripted routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method` on `path` (e.g. `/api/part/5`).
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Ok(HttpResponse::new(status, body)))
    }

    /// Queue a transport-level failure for `method` on `path`.
    pub fn fail(&self, method: HttpMethod, path: &str, error: FishbowlError) -> &Self {
        self.push(method, path, Err(error))
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Result<HttpResponse>) -> &Self {
        let mut routes = self.routes.lock();
        if let Some(route) = routes.iter_mut().find(|r| r.method == method && r.path == path) {
            route.replies.push_back(reply);
        } else {
            routes.push(Route { method, path: path.to_string(), replies: VecDeque::from([reply]) });
        }
        drop(routes);
        self
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Requests received for `method` on `path`.
    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.method == method && request_path(&request.url) == path)
            .cloned()
            .collect()
    }

    /// Number of requests received for `method` on `path`.
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

/// Path portion of an absolute URL, without the query string.
fn request_path(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme.find('/').map_or("/", |index| &without_scheme[index..]);
    path.split_once('?').map_or(path, |(path, _)| path)
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = request_path(&request.url).to_string();
        let method = request.method;
        self.requests.lock().push(request);

        let mut routes = self.routes.lock();
        let Some(route) = routes.iter_mut().find(|r| r.method == method && r.path == path) else {
            let message = format!("no scripted route for {method} {path}");
            return Ok(HttpResponse::new(404, json!({ "message": message })));
        };

        if route.replies.len() > 1 {
            route
                .replies
                .pop_front()
                .unwrap_or_else(|| Err(FishbowlError::Internal("empty script".into())))
        } else {
            route
                .replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err(FishbowlError::Internal("empty script".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_strips_authority_and_query() {
        assert_eq!(request_path("https://fb.test:443/api/part?number=A1"), "/api/part");
        assert_eq!(request_path("http://localhost:8080"), "/");
    }

    #[tokio::test]
    async fn replays_queue_then_repeats_last() {
        let transport = ScriptedTransport::new();
        transport.respond(HttpMethod::Get, "/api/x", 200, json!(1));
        transport.respond(HttpMethod::Get, "/api/x", 200, json!(2));

        let mut seen = Vec::new();
        for _ in 0..3 {
            let response =
                transport.send(HttpRequest::new(HttpMethod::Get, "https://h/api/x")).await.unwrap();
            seen.push(response.body);
        }

        assert_eq!(seen, vec![json!(1), json!(2), json!(2)]);
        assert_eq!(transport.count(HttpMethod::Get, "/api/x"), 3);
    }
}
