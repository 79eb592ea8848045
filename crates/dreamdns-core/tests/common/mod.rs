//! Test doubles and common utilities for reconciliation contract tests
//!
//! The stub provider keeps records in memory and logs every call so tests
//! can assert on exactly which requests a reconciliation made.

#![allow(dead_code)]

use dreamdns_core::error::{Error, Result};
use dreamdns_core::record::{Ack, DnsRecord, RecordSet};
use dreamdns_core::traits::DnsApi;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

/// One request observed by the stub provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Add { hostname: String, value: String },
    Remove { hostname: String, value: String },
}

/// Which call kind the stub should fail, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    List,
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Protocol,
    Api,
}

impl FailureKind {
    fn to_error(self, command: &str) -> Error {
        match self {
            FailureKind::Transport => {
                Error::transport(command, "https://stub/?key=REDACTED", "connection refused")
            }
            FailureKind::Protocol => Error::protocol(command, "<html>502 Bad Gateway</html>"),
            FailureKind::Api => Error::api(
                command,
                "internal_error",
                r#"{"result":"error","data":"internal_error"}"#,
            ),
        }
    }
}

/// An in-memory DnsApi that records calls
///
/// Clones share state, so a test can hand one clone to the reconciler and
/// inspect the other.
#[derive(Clone, Default)]
pub struct StubDnsApi {
    records: Arc<Mutex<Vec<DnsRecord>>>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
    failure: Arc<Mutex<Option<(CallKind, FailureKind)>>>,
}

impl StubDnsApi {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    /// Make every call of `call` fail with `failure`
    pub fn fail_on(&self, call: CallKind, failure: FailureKind) {
        *self.failure.lock().unwrap() = Some((call, failure));
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that changed provider state
    pub fn mutating_calls(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, ApiCall::List))
            .collect()
    }

    /// Current provider-side records
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check_failure(&self, call: CallKind, command: &str) -> Result<()> {
        match *self.failure.lock().unwrap() {
            Some((kind, failure)) if kind == call => Err(failure.to_error(command)),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl DnsApi for StubDnsApi {
    async fn list_records(&self) -> Result<RecordSet> {
        self.calls.lock().unwrap().push(ApiCall::List);
        self.check_failure(CallKind::List, "dns-list_records")?;
        Ok(RecordSet::new(self.records()))
    }

    async fn add_record(&self, hostname: &str, ip: Ipv4Addr) -> Result<Ack> {
        self.calls.lock().unwrap().push(ApiCall::Add {
            hostname: hostname.to_string(),
            value: ip.to_string(),
        });
        self.check_failure(CallKind::Add, "dns-add_record")?;
        self.records
            .lock()
            .unwrap()
            .push(DnsRecord::address(hostname, ip.to_string()));
        Ok(Ack::new("record_added"))
    }

    async fn remove_record(&self, hostname: &str, value: &str) -> Result<Ack> {
        self.calls.lock().unwrap().push(ApiCall::Remove {
            hostname: hostname.to_string(),
            value: value.to_string(),
        });
        self.check_failure(CallKind::Remove, "dns-remove_record")?;

        let mut records = self.records.lock().unwrap();
        match records
            .iter()
            .position(|r| r.is_address_for(hostname) && r.value == value)
        {
            Some(index) => {
                records.remove(index);
                Ok(Ack::new("record_removed"))
            }
            None => Err(Error::api(
                "dns-remove_record",
                "no_such_record",
                r#"{"result":"error","data":"no_such_record"}"#,
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

pub fn add(hostname: &str, value: &str) -> ApiCall {
    ApiCall::Add {
        hostname: hostname.to_string(),
        value: value.to_string(),
    }
}

pub fn remove(hostname: &str, value: &str) -> ApiCall {
    ApiCall::Remove {
        hostname: hostname.to_string(),
        value: value.to_string(),
    }
}
