// ── Export documents ──
//
// A connected router's data written out as one JSON document. The shape
// is `{router, timestamp, addressLists, firewallRules}`; collections are
// kept verbatim so a document can be loaded back for offline comparison.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use tiklens_api::{AddressListEntry, FirewallRule};

use crate::error::CoreError;
use crate::model::{Credentials, DataOrigin, RouterState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Credentials as they were used for the connection, password included.
    pub router: Credentials,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub address_lists: Vec<AddressListEntry>,
    pub firewall_rules: Vec<FirewallRule>,
}

impl ExportDocument {
    /// Snapshot `state` at `now`. `None` when the router is not connected.
    pub fn capture(state: &RouterState, now: DateTime<Utc>) -> Option<Self> {
        if !state.is_connected() {
            return None;
        }
        Some(Self {
            router: state.credentials.clone(),
            timestamp: now.trunc_subsecs(3),
            address_lists: state.address_lists.clone(),
            firewall_rules: state.firewall_rules.clone(),
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `firewall-config-{name}-{YYYY-MM-DD}.json`, dated by the capture time.
    pub fn file_name(&self) -> String {
        format!(
            "firewall-config-{}-{}.json",
            sanitize(&self.router.name),
            self.timestamp.format("%Y-%m-%d")
        )
    }

    /// Connected state holding this document's data.
    pub fn into_state(self) -> RouterState {
        RouterState::connected(
            self.router,
            self.address_lists,
            self.firewall_rules,
            DataOrigin::Snapshot,
        )
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "router".into()
    } else {
        cleaned
    }
}

/// ISO-8601 UTC with millisecond precision (`2024-05-01T12:00:00.000Z`).
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
