//! End-to-end tests for the HTTP surface.

use reqwest::StatusCode;
use serde_json::{json, Value};

use healthgate::health::CheckOptions;

use crate::helpers::{assert_body_contains, assert_status, TestServer};

#[tokio::test]
async fn test_health_endpoint_healthy() {
    let server = TestServer::spawn().await;
    server.registry.register("database", CheckOptions::default(), || async {
        Ok(Some(json!({"pool": "ok"})))
    });
    server.registry.register("cache", CheckOptions::default(), || async { Ok(None) });

    let response = server.get("/health").await;
    assert_status(&response, StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["counts"]["total"], 2);
    assert_eq!(body["counts"]["healthy"], 2);
    assert_eq!(body["counts"]["unhealthy"], 0);
    assert_eq!(body["counts"]["errors"], 0);

    // Sweep results come back in registration order.
    let results = body["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "database");
    assert_eq!(results[1]["name"], "cache");

    server.stop();
}

#[tokio::test]
async fn test_health_endpoint_trailing_slash() {
    let server = TestServer::spawn().await;
    server
        .registry
        .register("database", CheckOptions::default(), || async { Ok(None) });

    // Slash-tolerant: /health/ is the aggregate, not a lookup of check "".
    let response = server.get("/health/").await;
    assert_status(&response, StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["counts"]["total"], 1);

    server.stop();
}

#[tokio::test]
async fn test_health_endpoint_redacts_without_details() {
    let server = TestServer::spawn().await;
    server.registry.register("database", CheckOptions::default(), || async {
        Ok(Some(json!({"replica_lag_ms": 3})))
    });
    server
        .registry
        .register("cache", CheckOptions::default().with_critical(false), || async {
            Err("connection refused".into())
        });

    // Redacted by default: entries carry only name, status, timestamp.
    let response = server.get("/health").await;
    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["counts"]["healthy"], 1);
    assert_eq!(body["counts"]["unhealthy"], 1);

    for entry in body["results"].as_array().expect("results array") {
        let keys: Vec<&str> = entry.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 3, "unexpected keys in redacted entry: {:?}", keys);
        assert!(entry.get("name").is_some());
        assert!(entry.get("status").is_some());
        assert!(entry.get("timestamp").is_some());
    }

    // details=true exposes errors, durations, and attempt counts.
    let response = server.get("/health?details=true").await;
    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.expect("json body");
    let results = body["results"].as_array().expect("results array");
    assert_eq!(results[0]["details"]["replica_lag_ms"], 3);
    assert_eq!(results[1]["error"], "connection refused");
    assert!(results[1]["attempts"].is_u64());

    server.stop();
}

#[tokio::test]
async fn test_single_check_endpoint() {
    let server = TestServer::spawn().await;
    server.registry.register("database", CheckOptions::default(), || async {
        Ok(Some(json!({"pool": "ok"})))
    });
    server
        .registry
        .register("cache", CheckOptions::default(), || async {
            Err("connection refused".into())
        });

    let response = server.get("/health/database").await;
    assert_status(&response, StatusCode::OK);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["name"], "database");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["details"]["pool"], "ok");
    assert!(body["duration_ms"].is_u64());

    let response = server.get("/health/cache").await;
    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["error"], "connection refused");

    server.stop();
}

#[tokio::test]
async fn test_single_check_unknown_name() {
    let server = TestServer::spawn().await;

    let response = server.get("/health/missing").await;
    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "health check 'missing' not found");
    assert!(body["timestamp"].is_string());

    server.stop();
}

#[tokio::test]
async fn test_single_check_percent_encoded_name() {
    let server = TestServer::spawn().await;
    server
        .registry
        .register("disk space", CheckOptions::default(), || async { Ok(None) });

    let response = server.get("/health/disk%20space").await;
    assert_status(&response, StatusCode::OK);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["name"], "disk space");

    server.stop();
}

#[tokio::test]
async fn test_dependencies_endpoint() {
    let server = TestServer::spawn().await;
    server.registry.register_dependency(
        "database",
        json!({"kind": "tcp", "target": "127.0.0.1:5432"}),
    );

    let response = server.get("/dependencies").await;
    assert_status(&response, StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["dependencies"]["database"]["kind"], "tcp");
    assert!(body["timestamp"].is_string());

    server.stop();
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let server = TestServer::spawn().await;
    server
        .registry
        .register("database", CheckOptions::default(), || async { Ok(None) });

    // One sweep so the counter families have samples.
    let response = server.get("/health").await;
    assert_status(&response, StatusCode::OK);

    let response = server.get("/metrics").await;
    assert_status(&response, StatusCode::OK);
    assert_body_contains(response, "healthgate_checks_total").await;

    // The route serves the notifier the registry records into.
    assert!(server.metrics.export().contains("check=\"database\""));

    server.stop();
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let server = TestServer::spawn().await;

    let response = server.get("/nope").await;
    assert_status(&response, StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "endpoint not found");
    assert_eq!(body["path"], "/nope");

    // Routes are GET-only.
    let response = server.post("/health").await;
    assert_status(&response, StatusCode::NOT_FOUND);

    server.stop();
}

#[tokio::test]
async fn test_panicking_check_returns_500() {
    let server = TestServer::spawn().await;
    server.registry.register("wild", CheckOptions::default(), || async {
        if true {
            panic!("boom");
        }
        Ok(None)
    });

    let response = server.get("/health/wild").await;
    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "boom");

    server.stop();
}
