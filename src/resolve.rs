use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;

/// Reverse hostname resolution for one address.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Timeout or failure means "no hostname", never an error. A device
    /// without a resolvable name is still reportable.
    async fn resolve(&self, address: Ipv4Addr, timeout: Duration) -> Option<String>;
}

/// Reverse DNS through the system resolver, run off the async runtime
/// since the lookup is a blocking call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve(&self, address: Ipv4Addr, timeout: Duration) -> Option<String> {
        let lookup =
            tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&IpAddr::V4(address)).ok());
        let name = tokio::time::timeout(timeout, lookup).await.ok()?.ok()??;
        // getnameinfo echoes the address back when no PTR record exists
        if name == address.to_string() {
            None
        } else {
            Some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_timeout_yields_no_hostname() {
        let resolver = DnsResolver;
        let name = resolver
            .resolve(Ipv4Addr::new(192, 0, 2, 1), Duration::ZERO)
            .await;
        assert_eq!(name, None);
    }
}
