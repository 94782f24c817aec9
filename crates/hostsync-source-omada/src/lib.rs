// # Omada Client Source
//
// This crate provides the Omada controller implementation of `ClientSource`
// for the hostsync system.
//
// ## Responsibilities
//
// - Decode the three controller credentials from the environment
// - Acquire and cache the OpenAPI access token (client-credentials grant)
// - Page through the client-listing endpoint, building the hostname→IP
//   mapping (normalize names, drop records missing either field,
//   last write wins on duplicates)
//
// ## Error semantics
//
// A failed listing aborts the whole fetch with an error naming the page.
// A partial mapping is never returned, so the engine can always tell a
// failed fetch from a controller that genuinely has zero clients.
//
// ## Security
//
// - The client secret never appears in logs
// - TLS verification is on by default; `insecure_tls` is an explicit
//   opt-in for controllers with self-signed certificates

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use hostsync_core::config::ControllerConfig;
use hostsync_core::traits::ClientSource;
use hostsync_core::{Error, HostMap, Result, normalize_hostname};

pub mod credentials;
pub mod token;

pub use credentials::Credentials;
pub use token::TokenManager;

#[derive(Deserialize)]
struct ClientListEnvelope {
    #[serde(rename = "errorCode")]
    error_code: i64,
    msg: Option<String>,
    result: Option<ClientPage>,
}

/// One page of the client listing
#[derive(Deserialize)]
struct ClientPage {
    #[serde(rename = "totalRows")]
    total_rows: u64,
    #[serde(default)]
    data: Vec<ClientRecord>,
}

/// Per-client record as returned by the controller.
///
/// Only the fields this system cares about; everything else in the payload
/// is ignored. Either field may be absent or empty.
#[derive(Debug, Deserialize)]
struct ClientRecord {
    name: Option<String>,
    ip: Option<String>,
}

/// Omada controller client source
pub struct OmadaSource {
    http: reqwest::Client,
    base_url: String,
    site: String,
    omadac_id: String,
    page_size: u32,
    tokens: TokenManager,
}

impl OmadaSource {
    /// Build a source from controller configuration and decoded credentials.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the HTTP client cannot be constructed.
    pub fn new(config: &ControllerConfig, credentials: Credentials) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if config.insecure_tls {
            warn!("TLS certificate verification disabled for controller requests");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let omadac_id = credentials.omadac_id.clone();
        let tokens = TokenManager::new(http.clone(), base_url.clone(), credentials);

        Ok(Self {
            http,
            base_url,
            site: config.site.clone(),
            omadac_id,
            page_size: config.page_size,
            tokens,
        })
    }

    /// The token manager (exposed for expiry checks and tests)
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// GET one page of the client listing
    async fn fetch_page(&self, token: &str, page: u32) -> Result<ClientPage> {
        let url = format!(
            "{}/openapi/v1/{}/sites/{}/clients?page={}&pageSize={}",
            self.base_url, self.omadac_id, self.site, page, self.page_size
        );

        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("AccessToken={token}"))
            .send()
            .await
            .map_err(|e| Error::transport(format!("client listing request failed on page {page}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::fetch(format!(
                "client listing returned HTTP {} on page {page}",
                response.status()
            )));
        }

        let envelope: ClientListEnvelope = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("failed to parse client listing on page {page}: {e}")))?;

        if envelope.error_code != 0 {
            return Err(Error::fetch(format!(
                "controller reported errorCode {} on page {page} ({})",
                envelope.error_code,
                envelope.msg.as_deref().unwrap_or("no message")
            )));
        }

        envelope
            .result
            .ok_or_else(|| Error::fetch(format!("client listing missing result payload on page {page}")))
    }
}

#[async_trait]
impl ClientSource for OmadaSource {
    /// Page through the client listing, accumulating the mapping.
    ///
    /// `totalRows` is captured from the first page and not re-read; the
    /// running count advances by the page size (capped at the total) and
    /// the loop terminates once it reaches the total, which also covers a
    /// controller reporting zero rows.
    async fn fetch_all(&self) -> Result<HostMap> {
        let mut hosts = HostMap::new();
        let mut page: u32 = 1;
        let mut total_rows: Option<u64> = None;
        let mut devices_count: u64 = 0;

        loop {
            let token = self.tokens.ensure_token().await?;
            let page_data = self.fetch_page(&token, page).await?;

            let total = *total_rows.get_or_insert(page_data.total_rows);
            devices_count = (devices_count + u64::from(self.page_size)).min(total);

            for client in page_data.data {
                let (Some(name), Some(ip)) = (client.name, client.ip) else {
                    continue;
                };
                if name.is_empty() || ip.is_empty() {
                    continue;
                }
                hosts.upsert(normalize_hostname(&name), ip);
            }

            if devices_count >= total {
                break;
            }
            page += 1;
        }

        debug!(clients = hosts.len(), pages = page, "client fetch complete");
        Ok(hosts)
    }

    fn source_name(&self) -> &'static str {
        "omada"
    }
}
