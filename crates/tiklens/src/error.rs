//! CLI error types with miette diagnostics.
//!
//! Maps connection failures, `CoreError` and `ConfigError` into
//! user-facing errors with actionable help text and exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tiklens_config::ConfigError;
use tiklens_core::{CoreError, FailureKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_CONNECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {router}: {reason}")]
    #[diagnostic(
        code(tiklens::connection_failed),
        help(
            "Check the router address and that its management endpoint is reachable.\n\
             Direct mode logs in on --auth-port (default 8728).\n\
             Use --on-failure fallback to continue with demo data."
        )
    )]
    ConnectionFailed { router: String, reason: String },

    #[error("Authentication failed for {router}: {reason}")]
    #[diagnostic(
        code(tiklens::auth_failed),
        help(
            "Verify the username and password.\n\
             Passwords come from --password, TIKLENS_PASSWORD or an interactive prompt."
        )
    )]
    AuthFailed { router: String, reason: String },

    #[error("Request to {router} timed out: {reason}")]
    #[diagnostic(
        code(tiklens::timeout),
        help("Increase the timeout with --timeout or check router responsiveness.")
    )]
    Timeout { router: String, reason: String },

    #[error("{router} returned an error: {message}")]
    #[diagnostic(code(tiklens::router_error))]
    RouterError { router: String, message: String },

    // ── Preconditions ────────────────────────────────────────────────
    #[error("{router} is not connected")]
    #[diagnostic(
        code(tiklens::not_connected),
        help("{reason}\nBoth routers must be connected (or loaded from a file) to compare.")
    )]
    NotConnected { router: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tiklens::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(tiklens::config),
        help("Check the config file (see: tiklens config path).")
    )]
    Config { message: String },

    // ── Export ───────────────────────────────────────────────────────
    #[error("Export failed: {message}")]
    #[diagnostic(code(tiklens::export))]
    Export { message: String },

    // ── Serve ────────────────────────────────────────────────────────
    #[error("Service failed on {listen}")]
    #[diagnostic(code(tiklens::serve))]
    Serve {
        listen: String,
        #[source]
        source: std::io::Error,
    },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(tiklens::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(tiklens::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotConnected { .. } => exit_code::NOT_CONNECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Error for a failed connection attempt on `router`.
    pub fn from_failure(router: &str, kind: FailureKind, message: String) -> Self {
        let router = router.to_owned();
        match kind {
            FailureKind::Unreachable => Self::ConnectionFailed {
                router,
                reason: message,
            },
            FailureKind::Authentication => Self::AuthFailed {
                router,
                reason: message,
            },
            FailureKind::Timeout => Self::Timeout {
                router,
                reason: message,
            },
            FailureKind::InvalidRequest => Self::Validation {
                field: "host".into(),
                reason: message,
            },
            FailureKind::Backend | FailureKind::MalformedResponse | FailureKind::Unknown => {
                Self::RouterError { router, message }
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotConnected { router } => CliError::NotConnected {
                router,
                reason: "No connection attempt succeeded.".into(),
            },
            CoreError::Export { message } => CliError::Export { message },
            CoreError::Config { message } | CoreError::Internal(message) => {
                CliError::Config { message }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
