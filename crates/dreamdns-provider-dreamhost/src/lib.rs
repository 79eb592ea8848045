// # DreamHost DNS API Client
//
// This crate implements `DnsApi` against the DreamHost HTTP API.
//
// ## Protocol
//
// Every call is a GET to a single endpoint with all parameters in the query
// string:
//
// - `cmd`: the command (`dns-list_records`, `dns-add_record`, `dns-remove_record`)
// - `key`: the API key
// - `format`: always `json`
// - command-specific fields (`record`, `type`, `value`)
//
// Responses are JSON envelopes tagged by `result`:
//
// ```json
// {"result": "success", "data": [ {"record": "home.example.com", "type": "A", "value": "1.2.3.4", ...} ]}
// {"result": "error", "data": "no_such_zone", "reason": "..."}
// ```
//
// ## Constraints
//
// - One HTTP request per trait call; no retry, no backoff, no caching
// - Request timeout always bounded
// - API key NEVER appears in logs or errors (URLs are sanitized)
//
// ## API Reference
//
// - DreamHost API: https://help.dreamhost.com/hc/en-us/articles/217560167-API-overview
// - DNS commands: https://help.dreamhost.com/hc/en-us/articles/217555707-DNS-API-commands

use async_trait::async_trait;
use dreamdns_core::config::{ApiKey, DreamdnsConfig};
use dreamdns_core::record::{Ack, DnsRecord, RecordSet};
use dreamdns_core::traits::DnsApi;
use dreamdns_core::{Error, Result};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Command listing DNS records
pub const CMD_LIST_RECORDS: &str = "dns-list_records";

/// Command adding a DNS record
pub const CMD_ADD_RECORD: &str = "dns-add_record";

/// Command removing a DNS record
pub const CMD_REMOVE_RECORD: &str = "dns-remove_record";

/// Response format selector sent with every call
const RESPONSE_FORMAT: &str = "json";

/// Record type sent with every command
const ADDRESS_TYPE: &str = "A";

/// Placeholder substituted for the key in logged URLs
const REDACTED: &str = "REDACTED";

/// Response envelope, decided right after parsing
#[derive(Debug, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
enum Envelope {
    Success {
        #[serde(default)]
        data: Value,
    },
    Error {
        #[serde(default)]
        data: Value,
        #[serde(default)]
        reason: Option<String>,
    },
}

/// DreamHost API client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform list requests normally
/// - Log the add/remove requests it would send
/// - **NOT** modify any DNS records
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
pub struct DreamhostClient {
    /// DreamHost API key
    /// ⚠️ NEVER log this value
    api_key: ApiKey,

    /// API endpoint
    base_url: Url,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip add/remove
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DreamhostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamhostClient")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url.as_str())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DreamhostClient {
    /// Create a new DreamHost client
    ///
    /// # Parameters
    ///
    /// - `api_key`: DreamHost API key with `dns-*` permissions
    /// - `api_url`: API endpoint (normally `https://api.dreamhost.com/`)
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform list requests but skip add/remove
    pub fn new(api_key: ApiKey, api_url: &str, timeout: Duration, dry_run: bool) -> Result<Self> {
        let base_url = Url::parse(api_url)
            .map_err(|e| Error::config(format!("Invalid API URL '{}': {}", api_url, e)))?;

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url,
            client,
            dry_run,
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &DreamdnsConfig) -> Result<Self> {
        let client = Self::new(
            config.api_key.clone(),
            &config.api_url,
            config.timeout(),
            config.dry_run,
        )?;

        if client.dry_run {
            tracing::warn!("DreamHost client running in DRY-RUN mode - no changes will be made");
        }

        Ok(client)
    }

    /// Create a live client against the default endpoint
    pub fn with_key(api_key: ApiKey) -> Result<Self> {
        Self::new(
            api_key,
            dreamdns_core::config::DEFAULT_API_URL,
            DEFAULT_HTTP_TIMEOUT,
            false,
        )
    }

    /// Whether mutating calls are suppressed
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Build the request URL for `command`, with the key or a placeholder
    fn command_url(&self, command: &str, params: &[(&str, &str)], key: &str) -> Result<Url> {
        let pairs = [("cmd", command), ("key", key), ("format", RESPONSE_FORMAT)]
            .into_iter()
            .chain(params.iter().copied());

        Url::parse_with_params(self.base_url.as_str(), pairs)
            .map_err(|e| Error::config(format!("Invalid API URL '{}': {}", self.base_url, e)))
    }

    /// URL safe to log: identical to the request URL except for the key
    fn sanitized_url(&self, command: &str, params: &[(&str, &str)]) -> String {
        self.command_url(command, params, REDACTED)
            .map(String::from)
            .unwrap_or_else(|_| self.base_url.to_string())
    }

    /// Invoke a command and return the `data` field of a successful response
    ///
    /// All three operations go through here so that key attachment, URL
    /// construction, and error classification happen in one place.
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /?cmd=<command>&key=<key>&format=json&<params...>
    /// ```
    pub async fn invoke(&self, command: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.command_url(command, params, self.api_key.expose())?;
        let log_url = self.sanitized_url(command, params);

        tracing::debug!("Calling {}: {}", command, log_url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the key
                let e = e.without_url();
                tracing::error!("{} request to {} failed: {}", command, log_url, e);
                Error::transport(command, &log_url, e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::transport(
                command,
                &log_url,
                format!("Failed to read response body: {}", e.without_url()),
            )
        })?;

        tracing::debug!("{} responded with status {}", command, status);

        classify_response(command, &log_url, status, &body)
    }
}

/// Turn a raw HTTP response into the success payload or a classified error
fn classify_response(command: &str, log_url: &str, status: StatusCode, body: &str) -> Result<Value> {
    let parsed = serde_json::from_str::<Envelope>(body);

    match parsed {
        Ok(Envelope::Error { data, reason }) => {
            tracing::error!("{} returned an error from {}: {}", command, log_url, body);
            let reason = reason
                .filter(|r| !r.is_empty())
                .or_else(|| data.as_str().map(str::to_string))
                .unwrap_or_else(|| data.to_string());
            Err(Error::api(command, reason, body))
        }
        Ok(Envelope::Success { data }) if status.is_success() => Ok(data),
        Ok(Envelope::Success { .. }) => {
            tracing::error!("{} returned HTTP {} from {}: {}", command, status, log_url, body);
            Err(Error::transport(
                command,
                log_url,
                format!("HTTP {} - {}", status, body),
            ))
        }
        Err(_) if !status.is_success() => {
            tracing::error!("{} returned HTTP {} from {}: {}", command, status, log_url, body);
            let message = if body.trim().is_empty() {
                format!("HTTP {} with empty body", status)
            } else {
                format!("HTTP {} - {}", status, body)
            };
            Err(Error::transport(command, log_url, message))
        }
        Err(e) => {
            tracing::error!("Non-JSON response from {}: {}", log_url, e);
            tracing::error!("{}", body);
            Err(Error::protocol(command, body))
        }
    }
}

/// Render an acknowledgement payload as text
fn ack_from(data: Value) -> Ack {
    match data {
        Value::String(s) => Ack::new(s),
        other => Ack::new(other.to_string()),
    }
}

#[async_trait]
impl DnsApi for DreamhostClient {
    /// List address records
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /?cmd=dns-list_records&key=<key>&format=json&type=A
    /// ```
    async fn list_records(&self) -> Result<RecordSet> {
        let data = self
            .invoke(CMD_LIST_RECORDS, &[("type", ADDRESS_TYPE)])
            .await?;

        let rendered = data.to_string();
        let records: Vec<DnsRecord> = serde_json::from_value(data).map_err(|e| {
            tracing::error!("Unexpected {} data: {}", CMD_LIST_RECORDS, e);
            Error::protocol(CMD_LIST_RECORDS, rendered)
        })?;

        Ok(RecordSet::new(records))
    }

    /// Create an address record
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /?cmd=dns-add_record&key=<key>&format=json&record=<hostname>&type=A&value=<ip>
    /// ```
    async fn add_record(&self, hostname: &str, ip: Ipv4Addr) -> Result<Ack> {
        let value = ip.to_string();
        let params = [
            ("record", hostname),
            ("type", ADDRESS_TYPE),
            ("value", value.as_str()),
        ];

        tracing::info!("Creating A record {} -> {}", hostname, ip);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {}",
                self.sanitized_url(CMD_ADD_RECORD, &params)
            );
            return Ok(Ack::new("dry_run"));
        }

        let data = self.invoke(CMD_ADD_RECORD, &params).await?;
        let ack = ack_from(data);
        tracing::info!("Attempted to create A record {}: {}", hostname, ack.data);
        Ok(ack)
    }

    /// Remove the address record matching hostname and value
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /?cmd=dns-remove_record&key=<key>&format=json&record=<hostname>&type=A&value=<old ip>
    /// ```
    async fn remove_record(&self, hostname: &str, value: &str) -> Result<Ack> {
        let params = [
            ("record", hostname),
            ("type", ADDRESS_TYPE),
            ("value", value),
        ];

        tracing::info!("Removing A record {} -> {}", hostname, value);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {}",
                self.sanitized_url(CMD_REMOVE_RECORD, &params)
            );
            return Ok(Ack::new("dry_run"));
        }

        let data = self.invoke(CMD_REMOVE_RECORD, &params).await?;
        let ack = ack_from(data);
        tracing::info!("Attempted to remove A record {}: {}", hostname, ack.data);
        Ok(ack)
    }

    fn provider_name(&self) -> &'static str {
        "dreamhost"
    }
}
