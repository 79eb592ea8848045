// # dreamdns - DreamHost dynamic DNS updater
//
// Thin integration layer: reads configuration, resolves the target IP, and
// runs one reconciliation. All DNS logic lives in dreamdns-core and the
// provider crate.
//
// Meant to be run periodically by cron or a systemd timer; each invocation
// does one reconciliation and exits. Overlapping runs for the same hostname
// are not coordinated.
//
// ## Configuration
//
// - `DREAMHOST_API_KEY`: API key (required)
// - `DREAMDNS_API_URL`: API endpoint override (optional)
// - `DREAMDNS_TIMEOUT_SECS`: Request timeout in seconds (optional, default 30)
// - `DREAMDNS_LOG_LEVEL`: Default log level (optional)
// - `DREAMDNS_MODE`: Set to `dry-run` to skip add/remove calls (optional)
//
// ## Example
//
// ```bash
// export DREAMHOST_API_KEY=your_key
// dreamdns home.example.com                   # detect public IP
// dreamdns home.example.com --ip 203.0.113.7  # explicit IP
// ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use dreamdns_core::{DreamdnsConfig, Error, IpSource, ReconcileOutcome, Reconciler};
use dreamdns_ip_http::HttpIpSource;
use dreamdns_provider_dreamhost::DreamhostClient;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Reconciliation succeeded (including "unchanged")
/// - 1: Configuration or startup error
/// - 2: Runtime error (transport, protocol, API, IP detection)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DreamdnsExitCode {
    /// Reconciliation succeeded
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DreamdnsExitCode> for ExitCode {
    fn from(code: DreamdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&Error> for DreamdnsExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::InvalidInput(_) => DreamdnsExitCode::ConfigError,
            _ => DreamdnsExitCode::RuntimeError,
        }
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Update a DreamHost DNS A record to point at the current public IP
#[derive(Debug, Parser)]
#[command(name = "dreamdns", version, about)]
struct Args {
    /// Hostname whose A record should be reconciled (e.g., home.example.com)
    hostname: String,

    /// IPv4 address to set; detected from public IP services when omitted
    #[arg(long)]
    ip: Option<Ipv4Addr>,

    /// Log verbosity [default: DREAMDNS_LOG_LEVEL or info]
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// List records but only log the add/remove calls that would be made
    #[arg(long)]
    dry_run: bool,

    /// IP echo service to query (repeatable; replaces the built-in list)
    #[arg(long = "ip-service", value_name = "URL")]
    ip_services: Vec<String>,
}

/// Load configuration and fold in command-line overrides
///
/// Runs before logging is initialized and before any network call.
fn prepare<F>(args: &Args, lookup: F) -> std::result::Result<(DreamdnsConfig, LogLevel), Error>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = DreamdnsConfig::from_lookup(lookup)?;
    if args.dry_run {
        config.dry_run = true;
    }

    let log_level = match (args.log_level, config.log_level.as_deref()) {
        (Some(level), _) => level,
        (None, Some(raw)) => LogLevel::from_str(raw.trim(), true).map_err(|_| {
            Error::config(format!(
                "DREAMDNS_LOG_LEVEL '{}' is not valid. Valid levels: debug, info, warning, error",
                raw
            ))
        })?,
        (None, None) => LogLevel::Info,
    };

    Ok((config, log_level))
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                DreamdnsExitCode::ConfigError.into()
            } else {
                DreamdnsExitCode::Success.into()
            };
        }
    };

    // Load configuration from environment
    let (config, log_level) = match prepare(&args, |name| std::env::var(name).ok()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return DreamdnsExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DreamdnsExitCode::ConfigError.into();
    }

    // One reconciliation is a strict sequence of calls; no worker threads needed
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DreamdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run(args, config));

    match result {
        Ok(outcome) => {
            info!("Reconciliation finished: {}", outcome);
            DreamdnsExitCode::Success.into()
        }
        Err(e) => {
            let code = e
                .downcast_ref::<Error>()
                .map(DreamdnsExitCode::from)
                .unwrap_or(DreamdnsExitCode::RuntimeError);
            error!("Reconciliation failed: {:#}", e);
            code.into()
        }
    }
}

/// Resolve the target IP and run one reconciliation
async fn run(args: Args, config: DreamdnsConfig) -> Result<ReconcileOutcome> {
    let desired_ip = match args.ip {
        Some(ip) => ip,
        None => {
            let source = if args.ip_services.is_empty() {
                HttpIpSource::default()
            } else {
                HttpIpSource::new(args.ip_services.clone())?
            };
            info!("Detecting public IP via {} source", source.source_name());
            source.current().await?
        }
    };

    let client = DreamhostClient::from_config(&config)?;
    let reconciler = Reconciler::new(Box::new(client));

    Ok(reconciler.update_ip(&args.hostname, desired_ip).await?)
}
