// ── Core error types ──
//
// User-facing errors from tiklens-core. Acquisition failures never show up
// here: they are folded into `ConnectionResult` at the acquirer boundary.
// These cover the fail-fast helpers (compare, export) and setup.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Precondition errors ──────────────────────────────────────────
    #[error("Both routers must be connected to compare: {router} is not connected")]
    NotConnected { router: String },

    // ── Export errors ────────────────────────────────────────────────
    #[error("Export failed: {message}")]
    Export { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Export {
            message: err.to_string(),
        }
    }
}
