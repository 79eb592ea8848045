// # HTTP IP Source
//
// Detects the current public IPv4 address by asking plain-text "what is my
// IP" services. Services are tried in order and the first one returning a
// well-formed IPv4 address wins.
//
// This is a one-shot lookup: nothing is cached and nothing is polled.

use dreamdns_core::traits::IpSource;
use dreamdns_core::{Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP check services, tried in order
pub const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://api.ipify.org",  // returns plain text IP
    "https://ifconfig.me/ip", // No rate limit documented
    "https://icanhazip.com",  // No rate limit documented
];

/// Default timeout for each service request
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URLs to fetch the IP from, in order
    services: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source over the given services
    pub fn new(services: Vec<String>) -> Result<Self> {
        Self::with_timeout(services, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom per-request timeout
    pub fn with_timeout(services: Vec<String>, timeout: Duration) -> Result<Self> {
        if services.is_empty() {
            return Err(Error::config("At least one IP service URL is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { services, client })
    }

    /// Fetch the IP from a single service
    async fn fetch_ip(&self, url: &str) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response from {}: {}", url, e)))?;

        let ip_text = ip_text.trim();

        ip_text
            .parse()
            .map_err(|_| Error::ip_source(format!("{} returned invalid IPv4 address: {}", url, ip_text)))
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self {
            services: DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        for url in &self.services {
            match self.fetch_ip(url).await {
                Ok(ip) => {
                    tracing::info!("Detected public IP {} via {}", ip, url);
                    return Ok(ip);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        Err(Error::ip_source(format!(
            "Could not detect public IP from any of {} service(s)",
            self.services.len()
        )))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
