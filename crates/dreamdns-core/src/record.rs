//! Record data model
//!
//! Records are immutable snapshots of what the provider reported. A change
//! is always expressed as remove-old plus add-new, never as a mutation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// DNS record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// Address record (IPv4)
    A,
    /// Any other type the provider returned; never written by dreamdns
    Other(String),
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Other(other) => other,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("A") {
            RecordType::A
        } else {
            RecordType::Other(value)
        }
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DNS record as reported by the provider's list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Fully qualified hostname (e.g., "home.example.com")
    pub record: String,

    /// Record value; an IPv4 address for address records
    pub value: String,

    /// Zone the record belongs to, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// Free-form comment attached at the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Provider flag telling whether the record can be edited via the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<String>,
}

impl DnsRecord {
    /// Create an address record
    pub fn address(record: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            record_type: RecordType::A,
            record: record.into(),
            value: value.into(),
            zone: None,
            comment: None,
            editable: None,
        }
    }

    /// Whether this is an address record for `hostname`
    pub fn is_address_for(&self, hostname: &str) -> bool {
        self.record_type == RecordType::A && self.record == hostname
    }

    /// Record value parsed as an IPv4 address, if it is one
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.value.trim().parse().ok()
    }
}

/// Ordered snapshot of records returned by one list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet(Vec<DnsRecord>);

impl RecordSet {
    /// Wrap records in provider order
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self(records)
    }

    /// All records, in provider order
    pub fn records(&self) -> &[DnsRecord] {
        &self.0
    }

    /// Address records for `hostname`, in provider order
    pub fn address_records_for(&self, hostname: &str) -> Vec<&DnsRecord> {
        self.0.iter().filter(|r| r.is_address_for(hostname)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DnsRecord>> for RecordSet {
    fn from(records: Vec<DnsRecord>) -> Self {
        Self::new(records)
    }
}

impl IntoIterator for RecordSet {
    type Item = DnsRecord;
    type IntoIter = std::vec::IntoIter<DnsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Acknowledgement of a mutating provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Provider status payload (e.g., "record_added")
    pub data: String,
}

impl Ack {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record already had the desired IP (no mutating call)
    Unchanged {
        /// The current IP address
        ip: Ipv4Addr,
    },
    /// No record existed; one was added
    Created {
        /// The created IP address
        ip: Ipv4Addr,
    },
    /// The old record was removed and a new one added
    Replaced {
        /// Raw value of the removed record
        previous: String,
        /// The new IP address
        ip: Ipv4Addr,
    },
}

impl ReconcileOutcome {
    /// IP address the record resolves to after reconciliation
    pub fn ip(&self) -> Ipv4Addr {
        match self {
            ReconcileOutcome::Unchanged { ip }
            | ReconcileOutcome::Created { ip }
            | ReconcileOutcome::Replaced { ip, .. } => *ip,
        }
    }

    /// Whether any mutating call was made
    pub fn is_changed(&self) -> bool {
        !matches!(self, ReconcileOutcome::Unchanged { .. })
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileOutcome::Unchanged { ip } => write!(f, "unchanged ({ip})"),
            ReconcileOutcome::Created { ip } => write!(f, "created ({ip})"),
            ReconcileOutcome::Replaced { previous, ip } => {
                write!(f, "replaced ({previous} -> {ip})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_record() {
        let json = serde_json::json!({
            "account_id": "1234",
            "zone": "example.com",
            "record": "home.example.com",
            "type": "A",
            "value": "1.2.3.4",
            "comment": "",
            "editable": "1"
        });

        let record: DnsRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.record_type, RecordType::A);
        assert_eq!(record.record, "home.example.com");
        assert_eq!(record.ipv4(), Some(Ipv4Addr::new(1, 2, 3, 4)));
        assert_eq!(record.zone.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_other_record_types_preserved() {
        let json = serde_json::json!({
            "record": "example.com",
            "type": "MX",
            "value": "0 mx1.example.com"
        });

        let record: DnsRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.record_type, RecordType::Other("MX".to_string()));
        assert!(!record.is_address_for("example.com"));
        assert_eq!(record.ipv4(), None);
    }

    #[test]
    fn test_address_records_for_keeps_order() {
        let set = RecordSet::new(vec![
            DnsRecord::address("other.example.com", "9.9.9.9"),
            DnsRecord::address("home.example.com", "1.1.1.1"),
            DnsRecord::address("home.example.com", "2.2.2.2"),
        ]);

        let matches = set.address_records_for("home.example.com");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "1.1.1.1");
        assert_eq!(matches[1].value, "2.2.2.2");
    }

    #[test]
    fn test_outcome_display() {
        let ip = Ipv4Addr::new(5, 6, 7, 8);
        let outcome = ReconcileOutcome::Replaced {
            previous: "1.2.3.4".to_string(),
            ip,
        };
        assert_eq!(outcome.to_string(), "replaced (1.2.3.4 -> 5.6.7.8)");
        assert_eq!(outcome.ip(), ip);
        assert!(outcome.is_changed());
        assert!(!ReconcileOutcome::Unchanged { ip }.is_changed());
    }
}
