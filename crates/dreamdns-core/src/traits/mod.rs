//! Core traits for dreamdns
//!
//! - [`DnsApi`]: List, add and remove address records at a DNS provider
//! - [`IpSource`]: Detect the current public IPv4 address

pub mod dns_api;
pub mod ip_source;

pub use dns_api::DnsApi;
pub use ip_source::IpSource;
