// ── Address-list reconciliation ──
//
// Two entries are the same when list name and address match. Identifier,
// comment, timeout and flags never take part in identity.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use tiklens_api::AddressListEntry;

use crate::error::CoreError;
use crate::model::RouterState;

/// Identity of an address-list entry across routers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub list: String,
    pub address: String,
}

impl EntryKey {
    pub fn of(entry: &AddressListEntry) -> Self {
        Self {
            list: entry.list.clone(),
            address: entry.address.clone(),
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.list, self.address)
    }
}

impl Serialize for EntryKey {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Counts shown next to the differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterSummary {
    pub name: String,
    pub host: String,
    pub address_lists: usize,
    pub firewall_rules: usize,
}

impl RouterSummary {
    fn of(state: &RouterState) -> Self {
        Self {
            name: state.display_name().to_owned(),
            host: state.credentials.host.clone(),
            address_lists: state.address_lists.len(),
            firewall_rules: state.firewall_rules.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub first: RouterSummary,
    pub second: RouterSummary,
    pub only_in_first: BTreeSet<EntryKey>,
    pub only_in_second: BTreeSet<EntryKey>,
}

impl Comparison {
    pub fn total_differences(&self) -> usize {
        self.only_in_first.len() + self.only_in_second.len()
    }

    pub fn is_identical(&self) -> bool {
        self.total_differences() == 0
    }

    /// The same comparison with the routers relabeled.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
            only_in_first: self.only_in_second,
            only_in_second: self.only_in_first,
        }
    }
}

/// Set difference of address-list entries in both directions.
///
/// Both routers must be connected; no partial comparison is produced.
pub fn compare(first: &RouterState, second: &RouterState) -> Result<Comparison, CoreError> {
    for state in [first, second] {
        if !state.is_connected() {
            return Err(CoreError::NotConnected {
                router: state.display_name().to_owned(),
            });
        }
    }

    let a = key_set(&first.address_lists);
    let b = key_set(&second.address_lists);

    Ok(Comparison {
        first: RouterSummary::of(first),
        second: RouterSummary::of(second),
        only_in_first: a.difference(&b).cloned().collect(),
        only_in_second: b.difference(&a).cloned().collect(),
    })
}

fn key_set(entries: &[AddressListEntry]) -> BTreeSet<EntryKey> {
    entries.iter().map(EntryKey::of).collect()
}
