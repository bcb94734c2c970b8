//! HTTP surface for the health registry.
//!
//! Serves the check results over plain HTTP/1.1:
//!
//! - `GET /health`: run every registered check, 200 when the aggregate is
//!   healthy, 503 otherwise. Per-check entries are redacted to
//!   `{name, status, timestamp}` unless the query string carries
//!   `details=true`.
//! - `GET /health/{name}`: run a single check, 200/503 with the full
//!   result. Unknown names and internal faults produce a 500 JSON body.
//! - `GET /dependencies`: dependency metadata registered alongside checks.
//! - `GET /metrics`: Prometheus text exposition.
//!
//! One task per connection; the accept loop stops when the shutdown watch
//! flips, leaving in-flight connections to finish on their own.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures_util::FutureExt;
use http_body_util::Full;
use hyper::body::Incoming as IncomingBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

use crate::health::{now_rfc3339, HealthCheckRegistry};
use crate::observability::MetricsNotifier;

/// Bind `addr` and serve until the shutdown watch fires.
pub async fn run_server(
    addr: SocketAddr,
    registry: Arc<HealthCheckRegistry>,
    metrics: Arc<MetricsNotifier>,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Health server listening on http://{}", addr);
    serve(listener, registry, metrics, shutdown_rx).await
}

/// Serve connections on an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    registry: Arc<HealthCheckRegistry>,
    metrics: Arc<MetricsNotifier>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, _) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("Accept error: {}", e);
                        continue;
                    }
                };
                let _ = stream.set_nodelay(true);
                let registry = Arc::clone(&registry);
                let metrics = Arc::clone(&metrics);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let registry = Arc::clone(&registry);
                        let metrics = Arc::clone(&metrics);
                        async move { handle_request(req, registry, metrics).await }
                    });

                    let io = TokioIo::new(stream);
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
            _ = shutdown_rx.changed() => {
                info!("Health server shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Route a single request and emit the access log line.
async fn handle_request(
    req: Request<IncomingBody>,
    registry: Arc<HealthCheckRegistry>,
    metrics: Arc<MetricsNotifier>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let include_details = wants_details(req.uri().query());

    let response = if method != Method::GET {
        not_found(&path)
    } else if path == "/health" || path == "/health/" {
        let report = registry.execute_all_checks().await;
        let status = if report.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        json_response(status, &report.to_json(include_details))
    } else if let Some(raw_name) = path.strip_prefix("/health/") {
        let name = percent_decode_str(raw_name).decode_utf8_lossy();
        handle_single_check(&registry, &name).await
    } else if path == "/dependencies" {
        let body = serde_json::json!({
            "dependencies": registry.dependencies(),
            "timestamp": now_rfc3339(),
        });
        json_response(StatusCode::OK, &body)
    } else if path == "/metrics" {
        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/plain; version=0.0.4")
            .body(Full::new(Bytes::from(metrics.export())))
            .unwrap()
    } else {
        not_found(&path)
    };

    info!(
        target: "access",
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        request_id = %request_id,
    );

    Ok(response)
}

/// Run one named check. A panicking check or an unknown name becomes a
/// 500 body instead of tearing down the connection.
async fn handle_single_check(
    registry: &HealthCheckRegistry,
    name: &str,
) -> Response<Full<Bytes>> {
    let outcome = AssertUnwindSafe(registry.execute_check(name))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(result)) => {
            let status = if result.status.is_healthy() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            json_response(status, &serde_json::json!(result))
        }
        Ok(Err(e)) => error_response(&e.to_string()),
        Err(panic) => error_response(&crate::health::panic_message(panic)),
    }
}

fn wants_details(query: Option<&str>) -> bool {
    query
        .map(|q| q.split('&').any(|pair| pair == "details=true"))
        .unwrap_or(false)
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn error_response(message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "status": "error",
        "error": message,
        "timestamp": now_rfc3339(),
    });
    json_response(StatusCode::INTERNAL_SERVER_ERROR, &body)
}

fn not_found(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "endpoint not found",
        "path": path,
        "timestamp": now_rfc3339(),
    });
    json_response(StatusCode::NOT_FOUND, &body)
}
