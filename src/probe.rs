use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::net::TcpStream;
use tokio::task::JoinSet;

/// Outcome of a single reachability check.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub address: Ipv4Addr,
    pub reachable: bool,
    pub timestamp: DateTime<Utc>,
}

/// Reachability test for one address. Implementations must be safe to
/// invoke concurrently for distinct addresses.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Never blocks longer than `timeout`; a timeout means unreachable,
    /// not an error.
    async fn probe(&self, address: Ipv4Addr, timeout: Duration) -> ProbeResult;
}

/// Ports tried by the default prober.
pub const DEFAULT_PROBE_PORTS: &[u16] = &[80, 443, 22, 445, 3389, 8080];

/// Reachability via parallel TCP connect attempts against a handful of
/// common ports. A refused connection still proves a live host: the RST
/// came from it.
#[derive(Debug, Clone)]
pub struct TcpProber {
    ports: Vec<u16>,
}

impl TcpProber {
    pub fn new(ports: Vec<u16>) -> Self {
        Self { ports }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_PORTS.to_vec())
    }
}

#[async_trait]
impl Probe for TcpProber {
    async fn probe(&self, address: Ipv4Addr, timeout: Duration) -> ProbeResult {
        let mut attempts = JoinSet::new();
        for &port in &self.ports {
            let addr = SocketAddr::new(IpAddr::V4(address), port);
            attempts.spawn(async move {
                match TcpStream::connect(addr).await {
                    Ok(stream) => {
                        drop(stream);
                        true
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => true,
                    Err(_) => false,
                }
            });
        }

        let reachable = tokio::time::timeout(timeout, async {
            while let Some(res) = attempts.join_next().await {
                if matches!(res, Ok(true)) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);
        attempts.abort_all();

        ProbeResult {
            address,
            reachable,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn listening_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let prober = TcpProber::new(vec![port]);
        let result = prober
            .probe(Ipv4Addr::LOCALHOST, Duration::from_millis(500))
            .await;
        assert!(result.reachable);
        assert_eq!(result.address, Ipv4Addr::LOCALHOST);
    }

    #[tokio::test]
    async fn refused_connection_counts_as_reachable() {
        // Bind then drop to get a port that actively refuses.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = TcpProber::new(vec![port]);
        let result = prober
            .probe(Ipv4Addr::LOCALHOST, Duration::from_millis(500))
            .await;
        assert!(result.reachable);
    }

    #[tokio::test]
    async fn probe_respects_timeout() {
        // TEST-NET-3, guaranteed unrouted.
        let prober = TcpProber::default();
        let started = Instant::now();
        let result = prober
            .probe("203.0.113.1".parse().unwrap(), Duration::from_millis(100))
            .await;
        assert!(!result.reachable);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
