// ── Per-slot router state ──
//
// Transitions consume the current value and return the next one; nothing
// is mutated in place. The status enum keeps "loading" and the terminal
// connected/failed states mutually exclusive.

use serde::Serialize;

use tiklens_api::{AddressListEntry, FirewallRule};

use super::credentials::Credentials;
use crate::fallback::ConnectOutcome;
use crate::result::FailureKind;

/// Where the data of a connected slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Retrieved from the router (directly or through the intermediary).
    Live,
    /// Demonstration dataset substituted after a failed attempt.
    Demo,
    /// Re-loaded from an export document.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected {
        origin: DataOrigin,
        /// Non-fatal explanation shown alongside the data (fallback reason).
        notice: Option<String>,
    },
    Failed {
        kind: FailureKind,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterState {
    pub credentials: Credentials,
    pub address_lists: Vec<AddressListEntry>,
    pub firewall_rules: Vec<FirewallRule>,
    pub status: SlotStatus,
}

impl RouterState {
    /// Fresh, disconnected state with empty collections.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            address_lists: Vec::new(),
            firewall_rules: Vec::new(),
            status: SlotStatus::Disconnected,
        }
    }

    /// Connected state built from already-known data.
    pub fn connected(
        credentials: Credentials,
        address_lists: Vec<AddressListEntry>,
        firewall_rules: Vec<FirewallRule>,
        origin: DataOrigin,
    ) -> Self {
        Self {
            credentials,
            address_lists,
            firewall_rules,
            status: SlotStatus::Connected {
                origin,
                notice: None,
            },
        }
    }

    /// A connect request was issued with `credentials`.
    ///
    /// Clears any previous error; prior collections stay until resolved.
    pub fn begin_connect(self, credentials: Credentials) -> Self {
        Self {
            credentials,
            status: SlotStatus::Connecting,
            ..self
        }
    }

    /// Fold the outcome of a connect request into the next state.
    ///
    /// Success replaces both collections wholesale; failure discards them.
    pub fn resolve(self, outcome: ConnectOutcome) -> Self {
        match outcome {
            ConnectOutcome::Connected {
                data,
                origin,
                notice,
            } => Self {
                credentials: self.credentials,
                address_lists: data.address_lists,
                firewall_rules: data.firewall_rules,
                status: SlotStatus::Connected { origin, notice },
            },
            ConnectOutcome::Failed { kind, error } => Self {
                credentials: self.credentials,
                address_lists: Vec::new(),
                firewall_rules: Vec::new(),
                status: SlotStatus::Failed { kind, error },
            },
        }
    }

    /// Data is displayable only when this is true.
    pub fn is_connected(&self) -> bool {
        matches!(self.status, SlotStatus::Connected { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SlotStatus::Connecting)
    }

    /// Failure message, or the notice attached to a fallback connection.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SlotStatus::Failed { error, .. } => Some(error),
            SlotStatus::Connected { notice, .. } => notice.as_deref(),
            SlotStatus::Disconnected | SlotStatus::Connecting => None,
        }
    }

    /// Kind of the failure, when the last attempt failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.status {
            SlotStatus::Failed { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<DataOrigin> {
        match self.status {
            SlotStatus::Connected { origin, .. } => Some(origin),
            _ => None,
        }
    }

    /// Display name, falling back to the host when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.credentials.name.trim().is_empty() {
            &self.credentials.host
        } else {
            &self.credentials.name
        }
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new(Credentials::for_slot(super::RouterSlot::Primary))
    }
}
