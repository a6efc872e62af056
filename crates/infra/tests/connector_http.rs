//! Connector scenarios against a wiremock Fishbowl server.

use std::sync::Arc;

use fishbowl_core::{ExecuteOptions, PollMode, PollOptions, SystemClock, TokenCache};
use fishbowl_domain::{Credential, FishbowlConfig, FishbowlError, Record};
use fishbowl_infra::{FishbowlConnector, ReqwestTransport};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config(server: &MockServer) -> FishbowlConfig {
    // The mock server URI already carries its port; split it back out.
    let uri = server.uri();
    let (base, port) = uri.rsplit_once(':').unwrap();
    FishbowlConfig::new(Credential::new(base, "admin", "secret").with_port(port.parse().unwrap()))
}

fn connector(config: FishbowlConfig) -> FishbowlConnector {
    FishbowlConnector::with_transport(
        config,
        Arc::new(ReqwestTransport::new().unwrap()),
        Arc::new(TokenCache::new(Arc::new(SystemClock))),
        Arc::new(SystemClock),
    )
}

fn none() -> CancellationToken {
    CancellationToken::new()
}

fn params(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

fn hits(requests: &[Request], verb: &str, route: &str) -> usize {
    requests.iter().filter(|r| r.method.as_str() == verb && r.url.path() == route).count()
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn get_part_sends_bearer_and_logs_in_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_partial_json(json!({
            "appName": "Fishbowl Connector",
            "appDescription": "Fishbowl workflow automation integration",
            "appId": 1234,
            "username": "admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/part/5"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(2)
        .mount(&server)
        .await;
    let connector = FishbowlConnector::from_config(config(&server)).unwrap();

    let part = params(json!({"partId": 5}));
    let first = connector.execute("part", "get", &part, &none()).await.unwrap();
    let second = connector.execute("part", "get", &part, &none()).await.unwrap();

    assert_eq!(first, vec![params(json!({"id": 5}))]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn return_all_with_single_page() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/api/part"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1}, {"id": 2}],
            "totalPages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector(config(&server));

    let records = connector
        .execute("part", "getAll", &params(json!({"returnAll": true})), &none())
        .await
        .unwrap();

    assert_eq!(records, vec![params(json!({"id": 1})), params(json!({"id": 2}))]);
}

#[tokio::test]
async fn unauthorized_response_reauthenticates_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok1"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_login(&server, "tok2").await;
    Mock::given(method("GET"))
        .and(path("/api/part/9"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/part/9"))
        .and(header("authorization", "Bearer tok2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .mount(&server)
        .await;
    let connector = connector(config(&server));

    let records =
        connector.execute("part", "get", &params(json!({"partId": 9})), &none()).await.unwrap();

    assert_eq!(records, vec![params(json!({"id": 9}))]);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(hits(&requests, "GET", "/api/part/9"), 2);
    assert_eq!(hits(&requests, "POST", "/api/login"), 2);
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/api/sales-order/404"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"message": "Sales order not found"}})),
        )
        .mount(&server)
        .await;
    let connector = connector(config(&server));

    let err = connector
        .execute("salesOrder", "get", &params(json!({"soId": 404})), &none())
        .await
        .unwrap_err();

    assert_eq!(err, FishbowlError::upstream(404, "Sales order not found"));
}

#[tokio::test]
async fn batch_continues_past_failures() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/api/vendor"))
        .and(query_param("name", "Acme Supply"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "Acme Supply"})),
        )
        .mount(&server)
        .await;
    let connector = connector(config(&server));
    let items = vec![
        params(json!({"vendorId": "Acme Supply", "byName": true})),
        params(json!({"byName": true})),
    ];
    let options = ExecuteOptions { continue_on_fail: true };

    let records =
        connector.execute_batch("vendor", "get", &items, options, &none()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], json!(3));
    assert_eq!(records[1]["item"], json!(1));
}

#[tokio::test]
async fn credential_test_rejects_bad_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Invalid username or password"})),
        )
        .mount(&server)
        .await;
    let connector = connector(config(&server));

    let err = connector.test_credentials().await.unwrap_err();

    assert!(matches!(err, FishbowlError::Authentication(_)));
}

#[tokio::test]
async fn poll_persists_cursor_to_state_file() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/api/sales-orders"))
        .and(query_param("status", "Shipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"id": 12, "status": "Shipped"}]})),
        )
        .mount(&server)
        .await;
    let dir = tempfile::TempDir::new().unwrap();
    let state_path = dir.path().join("cursors.json");
    let mut config = config(&server);
    config.poll.state_path = Some(state_path.clone());
    let cursor_key = format!("{}#salesOrderShipped", config.credential.cache_key());
    let connector = connector(config);

    let records = connector
        .poll("salesOrderShipped", &PollOptions::default(), PollMode::Manual, &none())
        .await
        .unwrap();

    assert_eq!(records.map(|records| records.len()), Some(1));
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(state_path).unwrap()).unwrap();
    assert!(saved[cursor_key.as_str()].is_string());
    assert_eq!(saved.as_object().map(|cursors| cursors.len()), Some(1));
}

#[tokio::test]
async fn accounts_sharing_a_state_file_keep_their_own_cursors() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path("/api/parts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;
    let dir = tempfile::TempDir::new().unwrap();
    let state_path = dir.path().join("cursors.json");
    let mut admin = config(&server);
    admin.poll.state_path = Some(state_path.clone());
    let mut clerk = admin.clone();
    clerk.credential.username = "clerk".into();

    for config in [admin, clerk] {
        connector(config)
            .poll("partUpdated", &PollOptions::default(), PollMode::Manual, &none())
            .await
            .unwrap();
    }

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(state_path).unwrap()).unwrap();
    let mut keys: Vec<_> = saved.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys.len(), 2);
    assert!(keys[0].ends_with(":admin#partUpdated"));
    assert!(keys[1].ends_with(":clerk#partUpdated"));
}
