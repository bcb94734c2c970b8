//! Test helpers and utilities

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tokio::net::TcpListener;
use tokio::sync::watch;

use healthgate::health::HealthCheckRegistry;
use healthgate::observability::MetricsNotifier;
use healthgate::server::serve;

/// In-process server handle for one test.
pub struct TestServer {
    pub base_url: String,
    pub registry: Arc<HealthCheckRegistry>,
    pub metrics: Arc<MetricsNotifier>,
    pub client: Client,
    shutdown_tx: watch::Sender<bool>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawn the server on 127.0.0.1:0 with a metrics-backed registry.
    pub async fn spawn() -> Self {
        let metrics = Arc::new(MetricsNotifier::new().expect("metrics notifier"));
        let notifier: Arc<dyn healthgate::health::CheckNotifier> = Arc::clone(&metrics) as _;
        let registry = Arc::new(HealthCheckRegistry::with_notifier(notifier));
        Self::spawn_with(registry, metrics).await
    }

    /// Spawn the server around a pre-seeded registry.
    pub async fn spawn_with(
        registry: Arc<HealthCheckRegistry>,
        metrics: Arc<MetricsNotifier>,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener addr");
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(serve(
            listener,
            Arc::clone(&registry),
            Arc::clone(&metrics),
            shutdown_rx,
        ));

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{}", addr),
            registry,
            metrics,
            client,
            shutdown_tx,
        }
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a POST request to the server (no body)
    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("POST request failed")
    }

    /// Stop the accept loop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Assert that response has expected status
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert that response body contains substring
#[allow(dead_code)]
pub async fn assert_body_contains(response: Response, substring: &str) {
    let body = response.text().await.expect("Failed to read body");
    assert!(
        body.contains(substring),
        "Body does not contain '{}'. Body: {}",
        substring,
        &body[..body.len().min(500)]
    );
}
