// ── Failure policy and demonstration dataset ──

use serde::{Deserialize, Serialize};
use tracing::warn;

use tiklens_api::{AddressListEntry, FirewallRule, RouterData};

use crate::model::DataOrigin;
use crate::result::{ConnectionResult, FailureKind};

/// What to do when a real acquisition attempt fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Show the demonstration dataset and keep the failure as a notice.
    #[default]
    #[serde(rename = "fallback")]
    UseFallback,
    /// Leave the slot in a failed state.
    #[serde(rename = "error")]
    SurfaceError,
}

/// A connection result after the failure policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected {
        data: RouterData,
        origin: DataOrigin,
        notice: Option<String>,
    },
    Failed {
        kind: FailureKind,
        error: String,
    },
}

/// Apply `policy` to the result of a real attempt.
pub fn resolve(policy: FailurePolicy, result: ConnectionResult) -> ConnectOutcome {
    match (result, policy) {
        (ConnectionResult::Success(data), _) => ConnectOutcome::Connected {
            data,
            origin: DataOrigin::Live,
            notice: None,
        },
        (ConnectionResult::Failure { kind, message }, FailurePolicy::UseFallback) => {
            warn!(?kind, error = %message, "acquisition failed, showing demo data");
            ConnectOutcome::Connected {
                data: demo_dataset(),
                origin: DataOrigin::Demo,
                notice: Some(fallback_notice(&message)),
            }
        }
        (ConnectionResult::Failure { kind, message }, FailurePolicy::SurfaceError) => {
            ConnectOutcome::Failed {
                kind,
                error: message,
            }
        }
    }
}

fn fallback_notice(error: &str) -> String {
    format!("Could not retrieve live data ({error}); showing demo data instead")
}

/// Fixed sample data shown when acquisition fails under
/// [`FailurePolicy::UseFallback`]. Identical on every call.
pub fn demo_dataset() -> RouterData {
    RouterData {
        address_lists: vec![
            demo_entry("*1", "whitelist", "192.168.1.100", "Primary server"),
            demo_entry("*2", "blacklist", "10.0.0.50", "Blocked IP"),
        ],
        firewall_rules: vec![
            demo_rule("*1", "accept", "whitelist", "Accept whitelist"),
            demo_rule("*2", "drop", "blacklist", "Block blacklist"),
        ],
    }
}

fn demo_entry(id: &str, list: &str, address: &str, comment: &str) -> AddressListEntry {
    AddressListEntry {
        comment: Some(comment.into()),
        ..AddressListEntry::new(id, list, address)
    }
}

fn demo_rule(id: &str, action: &str, src_list: &str, comment: &str) -> FirewallRule {
    FirewallRule {
        src_address_list: Some(src_list.into()),
        comment: Some(comment.into()),
        ..FirewallRule::new(id, "input", action)
    }
}
