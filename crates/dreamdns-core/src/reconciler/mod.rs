//! Address-record reconciler
//!
//! The Reconciler converges one hostname's address record to a desired IP:
//!
//! ```text
//!   list_records ──► select current record ──┬── none ─────────► add            (Created)
//!                                            ├── same value ───► nothing        (Unchanged)
//!                                            └── other value ──► remove, add    (Replaced)
//! ```
//!
//! At most three provider calls are made, strictly in sequence. Any failure
//! ends the reconciliation immediately: there is no retry, and a failed add
//! after a successful remove is not rolled back.

use crate::error::{Error, Result};
use crate::record::{DnsRecord, ReconcileOutcome};
use crate::traits::DnsApi;
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// Maximum length of a fully qualified hostname
const MAX_HOSTNAME_LEN: usize = 253;

/// Maximum length of a single hostname label
const MAX_LABEL_LEN: usize = 63;

/// Picks the record to compare against when several match a hostname
pub trait RecordSelector: Send + Sync {
    /// Choose one of `candidates` (address records for `hostname`, in
    /// provider order), or `None` to treat the hostname as having no record
    fn select<'r>(&self, hostname: &str, candidates: &[&'r DnsRecord]) -> Option<&'r DnsRecord>;
}

/// First record in provider response order wins
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl RecordSelector for FirstMatch {
    fn select<'r>(&self, _hostname: &str, candidates: &[&'r DnsRecord]) -> Option<&'r DnsRecord> {
        candidates.first().copied()
    }
}

/// Converges one hostname's address record to a desired IP
pub struct Reconciler {
    /// Provider API client
    api: Box<dyn DnsApi>,

    /// Tie-break policy for hostnames with several address records
    selector: Box<dyn RecordSelector>,
}

impl Reconciler {
    /// Create a reconciler with the first-match selection policy
    pub fn new(api: Box<dyn DnsApi>) -> Self {
        Self {
            api,
            selector: Box::new(FirstMatch),
        }
    }

    /// Replace the record selection policy
    pub fn with_selector(mut self, selector: Box<dyn RecordSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Fetch the record currently considered authoritative for `hostname`
    pub async fn current_record(&self, hostname: &str) -> Result<Option<DnsRecord>> {
        let records = self.api.list_records().await?;
        debug!(
            "{} returned {} record(s)",
            self.api.provider_name(),
            records.len()
        );

        let candidates = records.address_records_for(hostname);
        let selected = self.selector.select(hostname, &candidates).cloned();

        if candidates.len() > 1 {
            warn!(
                "Found {} A records for {}; comparing against {}",
                candidates.len(),
                hostname,
                selected.as_ref().map_or("none", |r| r.value.as_str())
            );
        }

        Ok(selected)
    }

    /// Make the address record for `hostname` point at `desired_ip`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: what was done
    /// - `Err(Error)`: the first failure; later calls in the sequence are not made
    pub async fn update_ip(&self, hostname: &str, desired_ip: Ipv4Addr) -> Result<ReconcileOutcome> {
        validate_hostname(hostname)?;

        info!(
            "Reconciling A record via {}: {} -> {}",
            self.api.provider_name(),
            hostname,
            desired_ip
        );

        let outcome = match self.current_record(hostname).await? {
            None => {
                warn!("Cannot find A record for {}; creating it", hostname);
                let ack = self.api.add_record(hostname, desired_ip).await?;
                debug!("Add acknowledged: {}", ack.data);
                ReconcileOutcome::Created { ip: desired_ip }
            }
            Some(current) if current.ipv4() == Some(desired_ip) => {
                ReconcileOutcome::Unchanged { ip: desired_ip }
            }
            Some(current) => {
                info!(
                    "A record for {} is {}, replacing with {}",
                    hostname, current.value, desired_ip
                );
                let ack = self.api.remove_record(hostname, &current.value).await?;
                debug!("Remove acknowledged: {}", ack.data);
                let ack = self.api.add_record(hostname, desired_ip).await?;
                debug!("Add acknowledged: {}", ack.data);
                ReconcileOutcome::Replaced {
                    previous: current.value,
                    ip: desired_ip,
                }
            }
        };

        match &outcome {
            ReconcileOutcome::Unchanged { ip } => {
                info!("DNS record for {} already matches {}; no update needed", hostname, ip)
            }
            ReconcileOutcome::Created { ip } => info!("DNS record added for {}: {}", hostname, ip),
            ReconcileOutcome::Replaced { ip, .. } => {
                info!("DNS record updated for {}: {}", hostname, ip)
            }
        }

        Ok(outcome)
    }
}

/// Validate that a string is a usable hostname
///
/// Basic RFC 1035 checks: total length, label length, and label characters.
pub fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        return Err(Error::invalid_input("Hostname cannot be empty"));
    }

    if hostname.len() > MAX_HOSTNAME_LEN {
        return Err(Error::invalid_input(format!(
            "Hostname too long: {} chars (max {}). Got: {}",
            hostname.len(),
            MAX_HOSTNAME_LEN,
            hostname
        )));
    }

    for label in hostname.split('.') {
        if label.is_empty() {
            return Err(Error::invalid_input(format!(
                "Hostname has empty label: '{}'",
                hostname
            )));
        }

        if label.len() > MAX_LABEL_LEN {
            return Err(Error::invalid_input(format!(
                "Hostname label too long: {} chars (max {}). Label: '{}'",
                label.len(),
                MAX_LABEL_LEN,
                label
            )));
        }

        // Underscore is allowed for service-style labels
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::invalid_input(format!(
                "Hostname label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_input(format!(
                "Hostname label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_picks_first() {
        let a = DnsRecord::address("home.example.com", "1.1.1.1");
        let b = DnsRecord::address("home.example.com", "2.2.2.2");
        let candidates = vec![&a, &b];

        let selected = FirstMatch.select("home.example.com", &candidates);
        assert_eq!(selected, Some(&a));
        assert_eq!(FirstMatch.select("home.example.com", &[]), None);
    }

    #[test]
    fn test_validate_hostname_accepts_common_names() {
        assert!(validate_hostname("example.com").is_ok());
        assert!(validate_hostname("home.example.com").is_ok());
        assert!(validate_hostname("my-host.sub.example.co.uk").is_ok());
        assert!(validate_hostname("_acme.example.com").is_ok());
    }

    #[test]
    fn test_validate_hostname_rejects_bad_names() {
        assert!(validate_hostname("").is_err());
        assert!(validate_hostname("home..example.com").is_err());
        assert!(validate_hostname("-home.example.com").is_err());
        assert!(validate_hostname("home-.example.com").is_err());
        assert!(validate_hostname("ho me.example.com").is_err());
        assert!(validate_hostname(&format!("{}.com", "a".repeat(64))).is_err());
        assert!(validate_hostname(&"a.".repeat(127)).is_err());
    }
}
