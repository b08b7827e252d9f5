//! Flag-aware wrappers over `tiklens-config`.
//!
//! Global flags and per-command router arguments override the config file;
//! this is the one place where CLI flags are folded into core types.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::ValueEnum;
use secrecy::SecretString;

use tiklens_config::{Config, env_password};
use tiklens_core::{AcquisitionConfig, Credentials, FailurePolicy, RouterSlot};

use crate::cli::{ColorMode, GlobalOpts, OnFailureArg, OutputFormat, RouterArgs};
use crate::error::CliError;

// ── Config file ──────────────────────────────────────────────────────

/// `--config` / `TIKLENS_CONFIG`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(tiklens_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(tiklens_config::load_config_from(&config_path(global))?)
}

// ── Acquisition ──────────────────────────────────────────────────────

/// File section with global flag overrides applied.
pub fn acquisition_config(
    cfg: &mut Config,
    global: &GlobalOpts,
) -> Result<AcquisitionConfig, CliError> {
    let acq = &mut cfg.acquisition;
    if let Some(mode) = global.mode {
        acq.mode = mode.as_str().into();
    }
    if let Some(ref backend) = global.backend {
        acq.backend = Some(backend.clone());
    }
    if let Some(port) = global.auth_port {
        acq.auth_port = port;
    }
    if let Some(timeout) = global.timeout {
        acq.timeout = timeout;
    }
    if let Some(policy) = global.on_failure {
        acq.on_failure = match policy {
            OnFailureArg::Fallback => FailurePolicy::UseFallback,
            OnFailureArg::Error => FailurePolicy::SurfaceError,
        };
    }
    if global.insecure {
        acq.insecure = true;
    }
    Ok(tiklens_config::to_acquisition_config(acq)?)
}

// ── Presentation ─────────────────────────────────────────────────────

/// Flag > env > `[defaults] output` > table.
pub fn output_format(cfg: &Config, global: &GlobalOpts) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

pub fn color_mode(cfg: &Config, global: &GlobalOpts) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

// ── Credentials ──────────────────────────────────────────────────────

/// Per-invocation overrides of one router profile.
#[derive(Debug, Default)]
pub struct RouterOverrides {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl From<&RouterArgs> for RouterOverrides {
    fn from(args: &RouterArgs) -> Self {
        Self {
            host: args.host.clone(),
            username: args.username.clone(),
            password: args.password.clone(),
            name: args.name.clone(),
        }
    }
}

/// Build credentials for `slot`: profile, then flags, then password chain.
///
/// Password: flag > `TIKLENS_{SLOT}_PASSWORD` > `TIKLENS_PASSWORD` >
/// interactive prompt (only on a terminal) > empty. An empty host is
/// rejected here, before any connection attempt.
pub fn resolve_credentials(
    cfg: &Config,
    slot: RouterSlot,
    overrides: RouterOverrides,
) -> Result<Credentials, CliError> {
    let mut creds = cfg.credentials(slot);
    if let Some(host) = overrides.host {
        creds = creds.with_host(host);
    }
    if let Some(name) = overrides.name {
        creds = creds.with_name(name);
    }
    if let Some(username) = overrides.username {
        creds.username = username;
    }

    if creds.host.trim().is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: format!(
                "no address for the {slot} router; pass --host or set [routers.{slot}] host"
            ),
        });
    }
    if creds.username.trim().is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: format!(
                "no login user for the {slot} router; pass --username or set [routers.{slot}] username"
            ),
        });
    }

    let password = match overrides.password {
        Some(pw) => SecretString::from(pw),
        None => match env_password(slot) {
            Some(pw) => pw,
            None => prompt_password(&creds)?,
        },
    };
    Ok(Credentials {
        password,
        ..creds
    })
}

fn prompt_password(creds: &Credentials) -> Result<SecretString, CliError> {
    if !std::io::stdin().is_terminal() {
        return Ok(SecretString::from(String::new()));
    }
    let prompt = format!("Password for {}@{}: ", creds.username, creds.host);
    let pw = rpassword::prompt_password(prompt)?;
    Ok(SecretString::from(pw))
}
