// ── Runtime acquisition configuration ──
//
// These types describe *how* router data is acquired. They never touch
// disk: the CLI builds an `AcquisitionConfig` from its config file and
// flags and hands it in.

use std::time::Duration;

use url::Url;

use tiklens_api::{DEFAULT_AUTH_PORT, TlsMode, TransportConfig};

use crate::fallback::FailurePolicy;

/// Which acquisition surface a deployment talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Talk to the router's management endpoint directly.
    Direct { auth_port: u16 },
    /// Delegate to an intermediary service (`POST {backend}/api/connect`).
    Proxied { backend: Url },
}

impl Default for AcquisitionMode {
    fn default() -> Self {
        Self::Direct {
            auth_port: DEFAULT_AUTH_PORT,
        }
    }
}

/// TLS verification strategy for the router or intermediary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    pub mode: AcquisitionMode,
    pub tls: TlsVerification,
    /// Per-request timeout; expiry surfaces as a timeout failure.
    pub timeout: Duration,
    pub on_failure: FailurePolicy,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            mode: AcquisitionMode::default(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl AcquisitionConfig {
    /// Build a [`TransportConfig`] for the api clients.
    pub fn build_transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
            cookie_jar: None, // RouterOsClient::new adds one per session
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
