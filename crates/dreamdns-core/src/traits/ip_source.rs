// # IP Source Trait
//
// Defines the interface for detecting the current public IPv4 address.
//
// ## Implementations
//
// - HTTP echo services: `dreamdns-ip-http` crate

use crate::error::Result;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// A source is queried once per invocation; there is no watching or caching.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IPv4 address
    async fn current(&self) -> Result<Ipv4Addr>;

    /// Source name (for logging)
    fn source_name(&self) -> &'static str;
}
