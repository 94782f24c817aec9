//! Controller credentials, decoded once at startup
//!
//! Three base64-encoded values come from the environment. All three must be
//! present; every absent name is reported in a single error so the operator
//! fixes them in one pass. Decoding is a pure transform: a value that
//! fails to decode (or decodes to nothing) is an error, never a silent
//! empty string.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use hostsync_core::{Error, Result};

/// Environment variable holding the base64-encoded controller (omadac) ID
pub const ENV_OMADAC_ID: &str = "OMADA_ID";
/// Environment variable holding the base64-encoded client ID
pub const ENV_CLIENT_ID: &str = "OMADA_CLIENT_ID";
/// Environment variable holding the base64-encoded client secret
pub const ENV_CLIENT_SECRET: &str = "OMADA_CLIENT_SECRET";

/// Decoded controller credentials.
///
/// Immutable for the process lifetime. The secret is only reachable through
/// [`client_secret`](Self::client_secret) and is redacted from Debug output.
#[derive(Clone)]
pub struct Credentials {
    /// Controller (omadac) identifier, used in listing URLs
    pub omadac_id: String,
    /// OAuth client ID for the client-credentials grant
    pub client_id: String,
    client_secret: String,
}

// The client secret must never appear in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("omadac_id", &self.omadac_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Read and decode all three credentials from the environment.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] naming every absent variable
    /// - [`Error::MalformedCredential`] if any value fails to decode
    pub fn from_env() -> Result<Self> {
        let omadac_id = std::env::var(ENV_OMADAC_ID).ok();
        let client_id = std::env::var(ENV_CLIENT_ID).ok();
        let client_secret = std::env::var(ENV_CLIENT_SECRET).ok();

        let missing: Vec<&str> = [
            (ENV_OMADAC_ID, &omadac_id),
            (ENV_CLIENT_ID, &client_id),
            (ENV_CLIENT_SECRET, &client_secret),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::missing_credential(&missing));
        }

        Self::from_encoded(
            &omadac_id.unwrap_or_default(),
            &client_id.unwrap_or_default(),
            &client_secret.unwrap_or_default(),
        )
    }

    /// Decode credentials from already-read base64 values.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedCredential`] naming the offending variable.
    pub fn from_encoded(omadac_id: &str, client_id: &str, client_secret: &str) -> Result<Self> {
        Ok(Self {
            omadac_id: decode_credential(ENV_OMADAC_ID, omadac_id)?,
            client_id: decode_credential(ENV_CLIENT_ID, client_id)?,
            client_secret: decode_credential(ENV_CLIENT_SECRET, client_secret)?,
        })
    }

    /// The decoded client secret
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

/// Base64-decode a credential value, then UTF-8 decode and trim it.
fn decode_credential(name: &str, encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::malformed_credential(name, format!("invalid base64: {e}")))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| Error::malformed_credential(name, format!("not valid UTF-8: {e}")))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(Error::malformed_credential(name, "decodes to an empty value"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &str) -> String {
        STANDARD.encode(value)
    }

    #[test]
    fn decodes_all_three_values() {
        let creds = Credentials::from_encoded(
            &encode("omadac-1234"),
            &encode("client-abc"),
            &encode("s3cret"),
        )
        .unwrap();

        assert_eq!(creds.omadac_id, "omadac-1234");
        assert_eq!(creds.client_id, "client-abc");
        assert_eq!(creds.client_secret(), "s3cret");
    }

    #[test]
    fn trims_whitespace_inside_decoded_value() {
        let creds = Credentials::from_encoded(
            &encode("  omadac-1234\n"),
            &encode("client-abc"),
            &encode("s3cret"),
        )
        .unwrap();
        assert_eq!(creds.omadac_id, "omadac-1234");
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = Credentials::from_encoded("!!!not-base64!!!", &encode("x"), &encode("y"))
            .unwrap_err();
        assert!(
            matches!(&err, hostsync_core::Error::MalformedCredential { name, .. }
                if name == ENV_OMADAC_ID),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_non_utf8_payload() {
        let bad = STANDARD.encode([0xff, 0xfe, 0xfd]);
        let err =
            Credentials::from_encoded(&encode("x"), &bad, &encode("y")).unwrap_err();
        assert!(
            matches!(&err, hostsync_core::Error::MalformedCredential { name, .. }
                if name == ENV_CLIENT_ID)
        );
    }

    #[test]
    fn rejects_value_that_decodes_to_empty() {
        let err = Credentials::from_encoded(&encode("   "), &encode("x"), &encode("y"))
            .unwrap_err();
        assert!(matches!(
            err,
            hostsync_core::Error::MalformedCredential { .. }
        ));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let creds = Credentials::from_encoded(
            &encode("omadac-1234"),
            &encode("client-abc"),
            &encode("super-secret-value"),
        )
        .unwrap();

        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<REDACTED>"));
    }
}
