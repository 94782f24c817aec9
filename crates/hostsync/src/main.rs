// # hostsync - one-shot controller-to-DNS synchronizer
//
// The binary is a THIN integration layer only:
// 1. Reads configuration from environment variables
// 2. Initializes tracing and the runtime
// 3. Wires the Omada source and the Pi-hole sink into the engine
// 4. Runs exactly one sync pass and maps the outcome to an exit code
//
// All sync logic lives in hostsync-core and the implementation crates.
//
// ## Configuration
//
// ### Controller
// - `HOSTSYNC_CONTROLLER_URL`: controller base URL (required)
// - `HOSTSYNC_SITE`: site identifier (default: Default)
// - `HOSTSYNC_PAGE_SIZE`: client-listing page size (default: 100)
// - `HOSTSYNC_TIMEOUT_SECS`: HTTP timeout in seconds (default: 10)
// - `HOSTSYNC_INSECURE_TLS`: skip TLS verification, opt-in (default: false)
//
// ### Credentials (base64-encoded)
// - `OMADA_ID`, `OMADA_CLIENT_ID`, `OMADA_CLIENT_SECRET`
//
// ### DNS file and reload
// - `HOSTSYNC_DNS_FILE`: override file path (default: /etc/pihole/custom.list)
// - `HOSTSYNC_DOMAIN_SUFFIX`: suffix appended to hostnames (default: lan)
// - `HOSTSYNC_RELOAD_COMMAND`: reload command line
//   (default: /usr/local/bin/pihole restartdns)
//
// ### Run behavior
// - `HOSTSYNC_DRY_RUN`: fetch and render but touch nothing (default: false)
// - `HOSTSYNC_LOG_LEVEL`: trace|debug|info|warn|error (default: info)
//
// ## Example
//
// ```bash
// export HOSTSYNC_CONTROLLER_URL=https://192.168.0.110:443
// export OMADA_ID=$(echo -n my-omadac-id | base64)
// export OMADA_CLIENT_ID=$(echo -n my-client-id | base64)
// export OMADA_CLIENT_SECRET=$(echo -n my-secret | base64)
//
// hostsync
// ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Result;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use hostsync_core::config::{ControllerConfig, DnsFileConfig, ReloadConfig, SyncConfig};
use hostsync_core::{SyncEngine, SyncOutcome};
use hostsync_dns_pihole::PiholeSink;
use hostsync_source_omada::{Credentials, OmadaSource};

/// Exit codes for outcomes the error taxonomy does not cover
///
/// - 0: override file written and resolver reloaded (or dry-run completed)
/// - 1: configuration error
/// - 2: controller returned no usable clients; nothing was touched
///
/// Error classes map to codes 3..=8 via `hostsync_core::Error::exit_code`.
#[derive(Debug, Clone, Copy)]
enum RunExitCode {
    Success = 0,
    ConfigError = 1,
    NoClients = 2,
}

impl From<RunExitCode> for ExitCode {
    fn from(code: RunExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration read from the environment
struct Config {
    controller_url: String,
    site: String,
    page_size: u32,
    timeout_secs: u64,
    insecure_tls: bool,
    dns_file: PathBuf,
    domain_suffix: String,
    reload_command: String,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            controller_url: env::var("HOSTSYNC_CONTROLLER_URL").map_err(|_| {
                anyhow::anyhow!(
                    "HOSTSYNC_CONTROLLER_URL is required. \
                    Set it via: export HOSTSYNC_CONTROLLER_URL=https://192.168.0.110:443"
                )
            })?,
            site: env::var("HOSTSYNC_SITE").unwrap_or_else(|_| "Default".to_string()),
            page_size: parse_env("HOSTSYNC_PAGE_SIZE", 100)?,
            timeout_secs: parse_env("HOSTSYNC_TIMEOUT_SECS", 10)?,
            insecure_tls: parse_bool_env("HOSTSYNC_INSECURE_TLS")?,
            dns_file: env::var("HOSTSYNC_DNS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/etc/pihole/custom.list")),
            domain_suffix: env::var("HOSTSYNC_DOMAIN_SUFFIX").unwrap_or_else(|_| "lan".to_string()),
            reload_command: env::var("HOSTSYNC_RELOAD_COMMAND")
                .unwrap_or_else(|_| "/usr/local/bin/pihole restartdns".to_string()),
            dry_run: parse_bool_env("HOSTSYNC_DRY_RUN")?,
            log_level: env::var("HOSTSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Assemble the validated core configuration
    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            controller: ControllerConfig {
                base_url: self.controller_url.clone(),
                site: self.site.clone(),
                page_size: self.page_size,
                timeout_secs: self.timeout_secs,
                insecure_tls: self.insecure_tls,
            },
            dns_file: DnsFileConfig {
                path: self.dns_file.clone(),
                domain_suffix: self.domain_suffix.clone(),
            },
            reload: ReloadConfig {
                command: self.reload_command.clone(),
            },
        }
    }
}

/// Parse an optional numeric environment variable, failing on garbage
/// rather than silently falling back to the default.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} is not a valid number ({e}). Got: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Parse an optional boolean environment variable
fn parse_bool_env(name: &str) -> Result<bool> {
    match env::var(name) {
        Ok(raw) => parse_bool(&raw)
            .ok_or_else(|| anyhow::anyhow!("{name} must be true/false or 1/0. Got: {raw}")),
        Err(_) => Ok(false),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return RunExitCode::ConfigError.into();
        }
    };

    // Validate the assembled core configuration
    let sync_config = config.sync_config();
    if let Err(e) = sync_config.validate() {
        eprintln!("Configuration validation error: {e}");
        return RunExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return RunExitCode::ConfigError.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return RunExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        match run(&config, &sync_config).await {
            Ok(SyncOutcome::Updated { records }) => {
                info!(records, "sync complete");
                RunExitCode::Success.into()
            }
            Ok(SyncOutcome::NoClients) => {
                warn!("no clients acquired from the controller, nothing written");
                RunExitCode::NoClients.into()
            }
            Err(e) => {
                error!("sync failed: {e}");
                ExitCode::from(e.exit_code())
            }
        }
    })
}

/// Wire the components and run one sync pass
async fn run(config: &Config, sync_config: &SyncConfig) -> hostsync_core::Result<SyncOutcome> {
    info!(
        started_at = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z"),
        controller = %sync_config.controller.base_url,
        site = %sync_config.controller.site,
        dns_file = %sync_config.dns_file.path.display(),
        dry_run = config.dry_run,
        "starting hostsync run"
    );

    let credentials = Credentials::from_env()?;
    let source = OmadaSource::new(&sync_config.controller, credentials)?;
    let sink = PiholeSink::new(
        sync_config.dns_file.path.clone(),
        sync_config.dns_file.domain_suffix.clone(),
        sync_config.reload.argv(),
        config.dry_run,
    );

    let engine = SyncEngine::new(Box::new(source), Box::new(sink));
    engine.run_once().await
}
