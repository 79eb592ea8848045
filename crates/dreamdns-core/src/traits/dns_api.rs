// # DNS API Trait
//
// Defines the interface the reconciler uses to talk to a DNS provider.
//
// ## Implementations
//
// - DreamHost: `dreamdns-provider-dreamhost` crate
// - Tests: in-memory stubs under `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use dreamdns_core::DnsApi;
//
// let api = /* DnsApi implementation */;
// let records = api.list_records().await?;
// api.add_record("home.example.com", "1.2.3.4".parse()?).await?;
// ```

use crate::error::Result;
use crate::record::{Ack, RecordSet};
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for DNS provider API clients
///
/// Each method maps to exactly one provider request. Implementations must
/// not retry, cache, or decide whether a change is needed; that belongs to
/// the [`Reconciler`](crate::Reconciler).
///
/// Errors are classified as:
/// - [`Error::Transport`](crate::Error::Transport): the request never produced a usable response
/// - [`Error::Protocol`](crate::Error::Protocol): the body was not the expected structured format
/// - [`Error::Api`](crate::Error::Api): the provider reported an error status
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// List the account's address records, in provider order
    async fn list_records(&self) -> Result<RecordSet>;

    /// Create an address record mapping `hostname` to `ip`
    ///
    /// Not idempotent at the provider: calling twice may create a duplicate.
    async fn add_record(&self, hostname: &str, ip: Ipv4Addr) -> Result<Ack>;

    /// Remove the address record matching both `hostname` and `value`
    ///
    /// `value` is the raw string the provider reported, so records whose
    /// value is not a well-formed address can still be removed.
    async fn remove_record(&self, hostname: &str, value: &str) -> Result<Ack>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}
