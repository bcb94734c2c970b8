//! HTTP GET probe for upstream services.

use async_trait::async_trait;
use http::Uri;
use http_body_util::Empty;
use hyper::body::Bytes;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::Probe;
use crate::health::CheckError;

/// Probe that issues a GET request against an upstream endpoint.
///
/// Any response below 500 counts as reachable: a 401 from a service that
/// wants credentials still proves the service is up. 5xx responses and
/// transport errors fail the attempt.
pub struct HttpProbe {
    url: Uri,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpProbe {
    /// Create a probe for an absolute `http://` URL.
    pub fn new(url: Uri) -> Self {
        Self {
            url,
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn run(&self) -> Result<Option<serde_json::Value>, CheckError> {
        let response = self.client.get(self.url.clone()).await?;
        let status = response.status();

        if status.is_server_error() {
            return Err(format!("upstream returned {}", status).into());
        }

        Ok(Some(serde_json::json!({
            "reachable": true,
            "http_status": status.as_u16(),
        })))
    }

    fn kind(&self) -> &'static str {
        "http"
    }

    fn target(&self) -> String {
        self.url.to_string()
    }
}
