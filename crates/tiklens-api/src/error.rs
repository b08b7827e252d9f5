use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `tiklens-api` crate.
///
/// Covers every failure mode of both acquisition surfaces: the router's
/// REST session and the intermediary `/api/connect` service.
/// `tiklens-core` folds these into a `FailureKind` on the connection result.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the router (or session no longer valid).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The login endpoint answered, but not with a usable session bootstrap.
    #[error("Router unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error (empty or malformed host, bad backend URL).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Router host that is not a bare hostname or IP literal.
    #[error("Invalid router host {host:?}: {reason}")]
    InvalidHost { host: String, reason: &'static str },

    /// Request timed out.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// HTTP client could not be built.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote errors ───────────────────────────────────────────────
    /// Non-success answer from the router REST API or the intermediary.
    #[error("Backend error: {message}")]
    Backend {
        status: Option<u16>,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credentials were rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the target could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect(),
            Self::Unreachable { .. } => true,
            _ => false,
        }
    }

    /// Map a reqwest failure, surfacing timeouts as their own variant.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout }
        } else {
            Self::Transport(err)
        }
    }
}
