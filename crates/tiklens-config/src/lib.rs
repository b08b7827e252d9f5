//! Configuration for the tiklens CLI.
//!
//! TOML file plus `TIKLENS_` environment overrides, translated into
//! `tiklens_core::AcquisitionConfig` and per-slot `Credentials`. Passwords
//! are never read from or written to the file; they come from the
//! environment or an interactive prompt.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tiklens_core::{
    AcquisitionConfig, AcquisitionMode, Credentials, FailurePolicy, RouterSlot, TlsVerification,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub acquisition: Acquisition,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub routers: Routers,
}

impl Config {
    pub fn router(&self, slot: RouterSlot) -> Option<&RouterProfile> {
        match slot {
            RouterSlot::Primary => self.routers.primary.as_ref(),
            RouterSlot::Secondary => self.routers.secondary.as_ref(),
        }
    }

    /// Credentials for `slot` from its profile, without a password.
    pub fn credentials(&self, slot: RouterSlot) -> Credentials {
        self.router(slot)
            .map_or_else(|| Credentials::for_slot(slot), |p| p.credentials(slot))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// How router data is acquired.
#[derive(Debug, Deserialize, Serialize)]
pub struct Acquisition {
    /// "direct" or "proxied".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Intermediary base URL, required in proxied mode.
    pub backend: Option<String>,

    #[serde(default = "default_auth_port")]
    pub auth_port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Acquisition {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            backend: None,
            auth_port: default_auth_port(),
            timeout: default_timeout(),
            on_failure: FailurePolicy::default(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Routers {
    pub primary: Option<RouterProfile>,
    pub secondary: Option<RouterProfile>,
}

/// Identity of one router slot. No password field on purpose.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouterProfile {
    pub name: Option<String>,
    pub host: Option<String>,
    pub username: Option<String>,
}

impl RouterProfile {
    pub fn credentials(&self, slot: RouterSlot) -> Credentials {
        let mut creds = Credentials::for_slot(slot);
        if let Some(ref name) = self.name {
            creds = creds.with_name(name.clone());
        }
        if let Some(ref host) = self.host {
            creds = creds.with_host(host.clone());
        }
        if let Some(ref username) = self.username {
            creds.username.clone_from(username);
        }
        creds
    }
}

fn default_mode() -> String {
    "direct".into()
}
fn default_auth_port() -> u16 {
    tiklens_core::DEFAULT_AUTH_PORT
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "tiklens", "tiklens").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tiklens");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Nested keys use a double underscore in the environment, e.g.
/// `TIKLENS_ACQUISITION__AUTH_PORT=8729`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TIKLENS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the core acquisition config from the file section.
pub fn to_acquisition_config(acq: &Acquisition) -> Result<AcquisitionConfig, ConfigError> {
    let mode = match acq.mode.as_str() {
        "direct" => AcquisitionMode::Direct {
            auth_port: acq.auth_port,
        },
        "proxied" => {
            let raw = acq.backend.as_deref().ok_or_else(|| ConfigError::Validation {
                field: "backend".into(),
                reason: "required when mode is 'proxied'".into(),
            })?;
            let backend = raw.parse().map_err(|_| ConfigError::Validation {
                field: "backend".into(),
                reason: format!("invalid URL: {raw}"),
            })?;
            AcquisitionMode::Proxied { backend }
        }
        other => {
            return Err(ConfigError::Validation {
                field: "mode".into(),
                reason: format!("expected 'direct' or 'proxied', got '{other}'"),
            });
        }
    };

    let tls = if acq.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = acq.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(AcquisitionConfig {
        mode,
        tls,
        timeout: Duration::from_secs(acq.timeout),
        on_failure: acq.on_failure,
    })
}

// ── Password resolution (without CLI flags) ─────────────────────────

/// Password for `slot` from the environment.
///
/// `TIKLENS_PRIMARY_PASSWORD` / `TIKLENS_SECONDARY_PASSWORD` win over the
/// shared `TIKLENS_PASSWORD`.
pub fn env_password(slot: RouterSlot) -> Option<SecretString> {
    let slot_var = format!("TIKLENS_{}_PASSWORD", slot.to_string().to_ascii_uppercase());
    std::env::var(slot_var)
        .or_else(|_| std::env::var("TIKLENS_PASSWORD"))
        .ok()
        .map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.acquisition.mode, "direct");
        assert_eq!(config.acquisition.auth_port, 8728);
        assert_eq!(config.acquisition.on_failure, FailurePolicy::UseFallback);
        assert!(config.router(RouterSlot::Primary).is_none());
    }

    #[test]
    fn routers_and_acquisition_are_read() {
        let (_dir, path) = write_config(
            r#"
            [acquisition]
            mode = "proxied"
            backend = "http://localhost:5000"
            timeout = 10
            on_failure = "error"

            [routers.primary]
            name = "Main router"
            host = "192.168.88.1"
            username = "admin"
            "#,
        );
        let config = load_config_from(&path).unwrap();

        let acq = to_acquisition_config(&config.acquisition).unwrap();
        assert_eq!(
            acq.mode,
            AcquisitionMode::Proxied {
                backend: "http://localhost:5000".parse().unwrap()
            }
        );
        assert_eq!(acq.timeout, Duration::from_secs(10));
        assert_eq!(acq.on_failure, FailurePolicy::SurfaceError);

        let creds = config.credentials(RouterSlot::Primary);
        assert_eq!(creds.name, "Main router");
        assert_eq!(creds.host, "192.168.88.1");
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.id, "1");

        let creds = config.credentials(RouterSlot::Secondary);
        assert_eq!(creds.name, "Secondary router");
        assert!(creds.host.is_empty());
    }

    #[test]
    fn proxied_mode_requires_backend() {
        let acq = Acquisition {
            mode: "proxied".into(),
            ..Acquisition::default()
        };
        let err = to_acquisition_config(&acq).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "backend"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let acq = Acquisition {
            mode: "carrier-pigeon".into(),
            ..Acquisition::default()
        };
        assert!(to_acquisition_config(&acq).is_err());
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let acq = Acquisition {
            insecure: true,
            ca_cert: Some("/etc/ca.pem".into()),
            ..Acquisition::default()
        };
        let cfg = to_acquisition_config(&acq).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rendered_toml_never_contains_a_password_key() {
        let (_dir, path) = write_config(
            r#"
            [routers.secondary]
            host = "10.0.0.2"
            username = "admin"
            "#,
        );
        let rendered = load_config_from(&path).unwrap().to_toml().unwrap();
        assert!(rendered.contains("10.0.0.2"));
        assert!(!rendered.contains("password"));
    }
}
