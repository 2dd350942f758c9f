//! Health and Metrics Endpoint Tests

use axum_test::TestServer;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health/live").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_gateway_counts() {
    let app = TestApp::new();
    let _c1 = app.connect(Some("alice@x"), Some("call-1"));
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health/ready").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["gateway"]["active_connections"], 1);
    assert_eq!(body["gateway"]["online_identities"], 1);
    assert_eq!(body["gateway"]["active_rooms"], 1);
}

#[tokio::test]
async fn test_unknown_route_returns_json_error() {
    let app = TestApp::new();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/nope").await;
    response.assert_status_not_found();

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], 10001);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_gateway_metrics() {
    let app = TestApp::new();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    assert!(response.text().contains("chat_realtime_connections_active"));
}
