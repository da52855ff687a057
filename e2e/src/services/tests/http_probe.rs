//! Tests for HttpReadinessProbe against a wiremock app

use std::time::Duration;

use shared::CheckKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{TEST_TIMEOUT, target_for};
use crate::error::E2eError;
use crate::services::http_probe::{HttpReadinessProbe, bundle_ready};
use crate::traits::ReadinessProbe;

async fn probe_for(server: &MockServer) -> HttpReadinessProbe {
    HttpReadinessProbe::new(target_for(&server.uri()), TEST_TIMEOUT).unwrap()
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_check_200_is_ready() {
    let server = MockServer::start().await;
    mount(&server, "/api/__health_check", ResponseTemplate::new(200)).await;

    assert!(probe_for(&server).await.probe(CheckKind::Server).await.unwrap());
}

#[tokio::test]
async fn test_health_check_other_success_is_not_ready() {
    let server = MockServer::start().await;
    mount(&server, "/api/__health_check", ResponseTemplate::new(204)).await;

    assert!(!probe_for(&server).await.probe(CheckKind::Server).await.unwrap());
}

#[tokio::test]
async fn test_health_check_error_status_is_transient() {
    let server = MockServer::start().await;
    mount(&server, "/api/__health_check", ResponseTemplate::new(503)).await;

    let err = probe_for(&server).await.probe(CheckKind::Server).await.unwrap_err();

    assert!(err.is_transient());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_bundle_status_documents() {
    let server = MockServer::start().await;
    let probe = probe_for(&server).await;

    mount(
        &server,
        "/__umi/api/bundle-status",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "bundleStatus": { "done": false, "progress": 42 }
        })),
    )
    .await;
    assert!(!probe.probe(CheckKind::Ui).await.unwrap());

    server.reset().await;
    mount(
        &server,
        "/__umi/api/bundle-status",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "bundleStatus": { "done": true }
        })),
    )
    .await;
    assert!(probe.probe(CheckKind::Ui).await.unwrap());
}

#[tokio::test]
async fn test_bundle_status_ok_sentinel() {
    let server = MockServer::start().await;
    mount(&server, "/__umi/api/bundle-status", ResponseTemplate::new(200).set_body_string("ok")).await;

    assert!(probe_for(&server).await.probe(CheckKind::Ui).await.unwrap());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let probe = HttpReadinessProbe::new(
        target_for(&format!("http://127.0.0.1:{port}")),
        Duration::from_millis(500),
    )
    .unwrap();

    let err = probe.probe(CheckKind::Server).await.unwrap_err();
    assert!(matches!(err, E2eError::TransientProbe { check: CheckKind::Server, .. }));
}

#[test]
fn test_bundle_ready_bodies() {
    assert!(bundle_ready("ok"));
    assert!(bundle_ready("\"ok\""));
    assert!(bundle_ready(r#"{"bundleStatus":{"done":true}}"#));
    assert!(!bundle_ready(r#"{"bundleStatus":{"done":false}}"#));
    assert!(!bundle_ready(r#"{"bundleStatus":{}}"#));
    assert!(!bundle_ready(r#"{"status":"compiling"}"#));
    assert!(!bundle_ready("<html></html>"));
    assert!(!bundle_ready(""));
}
