//! Access-token lifecycle for the Omada OpenAPI
//!
//! The controller issues short-lived bearer tokens via the
//! client-credentials grant. The manager is a two-state machine (no token,
//! or a valid token with its expiry) and refreshes on demand. One network
//! call per refresh, no retries, nothing persisted across runs.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use hostsync_core::{Error, Result};

use crate::credentials::Credentials;

/// Token state machine.
///
/// `Valid` carries the reported expiry; the token is reused until exactly
/// that instant. No skew margin is applied, so a token whose lifetime is
/// reported as zero is expired the moment it arrives.
pub(crate) enum TokenState {
    /// No token held (initial state, and the state after any failed refresh)
    NoToken,
    /// A token believed valid until `expires_at`
    Valid {
        access_token: String,
        expires_at: DateTime<Utc>,
    },
}

impl TokenState {
    /// True if no token is held or `now` has reached the expiry.
    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::NoToken => true,
            Self::Valid { expires_at, .. } => now >= *expires_at,
        }
    }
}

#[derive(Deserialize)]
struct TokenEnvelope {
    #[serde(rename = "errorCode")]
    error_code: i64,
    msg: Option<String>,
    result: Option<TokenResult>,
}

#[derive(Deserialize)]
struct TokenResult {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "expiresIn")]
    expires_in: i64,
}

/// Acquires and caches the controller access token.
///
/// The state sits behind a `tokio::sync::Mutex`: the run is sequential, but
/// the lock keeps a refresh single-flight if the source is ever driven from
/// more than one task.
pub struct TokenManager {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    state: Mutex<TokenState>,
}

impl TokenManager {
    /// Create a manager in the no-token state
    pub fn new(http: reqwest::Client, base_url: String, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            state: Mutex::new(TokenState::NoToken),
        }
    }

    /// Return a token valid right now, refreshing it first if needed.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthFailure`] if the controller refuses the grant; the
    ///   manager falls back to the no-token state
    /// - [`Error::Transport`] on network-level failure
    pub async fn ensure_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let TokenState::Valid {
            access_token,
            expires_at,
        } = &*state
        {
            if Utc::now() < *expires_at {
                return Ok(access_token.clone());
            }
            debug!("access token expired, refreshing");
        }

        match self.request_token().await {
            Ok((access_token, expires_at)) => {
                info!(%expires_at, "access token acquired");
                *state = TokenState::Valid {
                    access_token: access_token.clone(),
                    expires_at,
                };
                Ok(access_token)
            }
            Err(e) => {
                *state = TokenState::NoToken;
                Err(e)
            }
        }
    }

    /// True if no usable token is currently held
    pub async fn is_expired(&self) -> bool {
        self.state.lock().await.is_expired(Utc::now())
    }

    /// POST the client-credentials grant to the controller
    async fn request_token(&self) -> Result<(String, DateTime<Utc>)> {
        let url = format!(
            "{}/openapi/authorize/token?grant_type=client_credentials",
            self.base_url
        );
        let body = serde_json::json!({
            "omadacId": self.credentials.omadac_id,
            "client_id": self.credentials.client_id,
            "client_secret": self.credentials.client_secret(),
        });

        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::auth(format!(
                "token endpoint returned HTTP {}",
                response.status()
            )));
        }

        let envelope: TokenEnvelope = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("failed to parse token response: {e}")))?;

        if envelope.error_code != 0 {
            return Err(Error::auth(format!(
                "controller refused token grant (errorCode {}: {})",
                envelope.error_code,
                envelope.msg.as_deref().unwrap_or("no message")
            )));
        }

        let result = envelope
            .result
            .ok_or_else(|| Error::auth("token response missing result payload"))?;

        Ok((
            result.access_token,
            Utc::now() + Duration::seconds(result.expires_in),
        ))
    }
}
