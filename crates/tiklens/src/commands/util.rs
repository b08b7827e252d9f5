//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use tiklens_core::{AcquisitionConfig, Acquirer, Dashboard, RouterState};

use crate::error::CliError;

/// Dashboard over the configured acquisition strategy.
pub fn dashboard(config: &AcquisitionConfig) -> Result<Dashboard<Acquirer>, CliError> {
    let acquirer = Acquirer::from_config(config)?;
    Ok(Dashboard::new(acquirer, config.on_failure))
}

/// Spinner on stderr while a request is in flight.
///
/// `None` when quiet or when stderr is not a terminal.
pub fn spinner(message: String, quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Turn a failed slot into the matching CLI error.
pub fn ensure_connected(state: &RouterState) -> Result<(), CliError> {
    if state.is_connected() {
        return Ok(());
    }
    let router = state.display_name();
    match (state.failure_kind(), state.error()) {
        (Some(kind), Some(message)) => {
            Err(CliError::from_failure(router, kind, message.to_owned()))
        }
        _ => Err(CliError::NotConnected {
            router: router.to_owned(),
            reason: "No connection attempt was made.".into(),
        }),
    }
}
