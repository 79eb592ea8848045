// # dreamdns-core
//
// Core library for the dreamdns address-record reconciler.
//
// ## Architecture Overview
//
// One invocation performs one reconciliation of one hostname:
// - **DnsApi**: Trait for listing, adding and removing address records at a provider
// - **IpSource**: Trait for detecting the current public IPv4 address
// - **Reconciler**: Compares the provider's record with the desired IP and converges it
// - **DreamdnsConfig**: Credential and transport settings, loaded once and injected
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic lives here, provider wire formats live in provider crates
// 2. **No Hidden State**: The credential is passed in explicitly, never read from a global
// 3. **Single-Shot**: No retries, no caching, no background tasks; errors propagate to the caller
// 4. **Library-First**: The binary is thin glue over this crate

pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{ApiKey, DreamdnsConfig};
pub use error::{Error, Result};
pub use reconciler::{FirstMatch, Reconciler, RecordSelector, validate_hostname};
pub use record::{Ack, DnsRecord, ReconcileOutcome, RecordSet, RecordType};
pub use traits::{DnsApi, IpSource};
