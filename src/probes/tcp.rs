//! TCP connect probe for datastore targets.

use async_trait::async_trait;
use tokio::net::TcpStream;

use super::Probe;
use crate::health::CheckError;

/// Probe that opens a TCP connection and reports the target reachable.
///
/// Port-level only: it says the database is listening, not that queries
/// succeed. Protocol-level checks belong in a custom closure check.
pub struct TcpProbe {
    addr: String,
}

impl TcpProbe {
    /// Create a probe for a `host:port` target.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn run(&self) -> Result<Option<serde_json::Value>, CheckError> {
        let stream = TcpStream::connect(&self.addr).await?;
        let peer = stream.peer_addr()?;

        Ok(Some(serde_json::json!({
            "connected": true,
            "peer": peer.to_string(),
        })))
    }

    fn kind(&self) -> &'static str {
        "tcp"
    }

    fn target(&self) -> String {
        self.addr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connects_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let probe = TcpProbe::new(addr.to_string());
        let details = probe.run().await.unwrap().unwrap();
        assert_eq!(details["connected"], true);
    }

    #[tokio::test]
    async fn test_closed_port_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = TcpProbe::new(addr.to_string());
        assert!(probe.run().await.is_err());
    }
}
