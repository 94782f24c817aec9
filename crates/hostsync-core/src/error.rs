//! Error types for the hostsync system
//!
//! Every error class is fatal to the current run: nothing is retried or
//! recovered locally. The binary maps each class to a distinct exit code
//! via [`Error::exit_code`].

use thiserror::Error;

/// Result type alias for hostsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hostsync system
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required credential values are absent from the environment
    #[error("missing credential(s): {0}")]
    MissingCredential(String),

    /// A credential value was present but could not be decoded
    #[error("malformed credential {name}: {reason}")]
    MalformedCredential {
        /// Environment variable name
        name: String,
        /// What went wrong during decoding
        reason: String,
    },

    /// Token acquisition or validation failed
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The controller reported an error during client listing
    #[error("client listing failed: {0}")]
    FetchFailure(String),

    /// Network-level failure talking to the controller
    #[error("transport error: {0}")]
    Transport(String),

    /// DNS override file I/O failure
    #[error("override file write failed: {0}")]
    WriteFailure(String),

    /// Resolver reload command failed or exited non-zero
    #[error("resolver reload failed: {0}")]
    ReloadFailure(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing-credential error naming every absent value
    pub fn missing_credential(names: &[&str]) -> Self {
        Self::MissingCredential(names.join(", "))
    }

    /// Create a malformed-credential error
    pub fn malformed_credential(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCredential {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthFailure(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchFailure(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a write error
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteFailure(msg.into())
    }

    /// Create a reload error
    pub fn reload(msg: impl Into<String>) -> Self {
        Self::ReloadFailure(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit code for this error class
    ///
    /// - 1: configuration / JSON
    /// - 3: credentials (missing or malformed)
    /// - 4: authentication
    /// - 5: client listing
    /// - 6: transport
    /// - 7: override file write
    /// - 8: resolver reload
    ///
    /// Codes 0 (clean run) and 2 (controller returned no usable clients) are
    /// assigned by the binary, not by an error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Json(_) => 1,
            Self::MissingCredential(_) | Self::MalformedCredential { .. } => 3,
            Self::AuthFailure(_) => 4,
            Self::FetchFailure(_) => 5,
            Self::Transport(_) => 6,
            Self::WriteFailure(_) => 7,
            Self::ReloadFailure(_) => 8,
        }
    }
}
