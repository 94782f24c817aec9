//! Configuration types for the hostsync system
//!
//! Everything the reference implementation hard-coded (base URL, page size,
//! file paths, domain suffix, reload command) lives here as documented
//! fields with defaults, injected into the components that need them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main hostsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Controller connection settings
    pub controller: ControllerConfig,

    /// DNS override file settings
    pub dns_file: DnsFileConfig,

    /// Resolver reload settings
    pub reload: ReloadConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.controller.validate()?;
        self.dns_file.validate()?;
        self.reload.validate()?;
        Ok(())
    }
}

/// Controller connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Controller base URL (e.g. "https://192.168.0.110:443")
    pub base_url: String,

    /// Site identifier on the controller
    #[serde(default = "default_site")]
    pub site: String,

    /// Page size for the client-listing endpoint
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Connect/read timeout for controller requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification for the controller.
    ///
    /// Off by default. Controllers with self-signed certificates need this,
    /// at the cost of transport security; a warning is logged when active.
    #[serde(default)]
    pub insecure_tls: bool,
}

impl ControllerConfig {
    /// Validate the controller configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("controller base URL cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "controller base URL must use http or https, got: {}",
                self.base_url
            )));
        }
        if self.site.is_empty() {
            return Err(crate::Error::config("controller site cannot be empty"));
        }
        if self.page_size == 0 {
            return Err(crate::Error::config("page size must be > 0"));
        }
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "timeout must be between 1 and 300 seconds, got: {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

/// DNS override file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsFileConfig {
    /// Path of the resolver's override file
    #[serde(default = "default_dns_file_path")]
    pub path: PathBuf,

    /// Domain suffix appended to every hostname (e.g. "lan")
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,
}

impl DnsFileConfig {
    /// Validate the DNS file configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.path.as_os_str().is_empty() {
            return Err(crate::Error::config("override file path cannot be empty"));
        }
        if self.domain_suffix.is_empty() {
            return Err(crate::Error::config("domain suffix cannot be empty"));
        }
        if self.domain_suffix.starts_with('.') {
            return Err(crate::Error::config(format!(
                "domain suffix must not start with a dot, got: {}",
                self.domain_suffix
            )));
        }
        if self.domain_suffix.chars().any(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "domain suffix must not contain whitespace, got: {:?}",
                self.domain_suffix
            )));
        }
        Ok(())
    }
}

impl Default for DnsFileConfig {
    fn default() -> Self {
        Self {
            path: default_dns_file_path(),
            domain_suffix: default_domain_suffix(),
        }
    }
}

/// Resolver reload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Reload command line, whitespace-separated program and arguments
    #[serde(default = "default_reload_command")]
    pub command: String,
}

impl ReloadConfig {
    /// The command split into program + arguments
    pub fn argv(&self) -> Vec<String> {
        self.command
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Validate the reload configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.argv().is_empty() {
            return Err(crate::Error::config("reload command cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            command: default_reload_command(),
        }
    }
}

fn default_site() -> String {
    "Default".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_dns_file_path() -> PathBuf {
    PathBuf::from("/etc/pihole/custom.list")
}

fn default_domain_suffix() -> String {
    "lan".to_string()
}

fn default_reload_command() -> String {
    "/usr/local/bin/pihole restartdns".to_string()
}
