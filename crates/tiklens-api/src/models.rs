// Wire models shared by both acquisition surfaces.
//
// Field names follow the RouterOS REST representation verbatim
// (`.id`, `src-address-list`, ...). The intermediary service mirrors the
// same records inside its `{success, data}` envelope.

use serde::{Deserialize, Serialize};

/// A single `/ip/firewall/address-list` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressListEntry {
    #[serde(rename = ".id", default)]
    pub id: String,
    #[serde(default)]
    pub list: String,
    /// IP, range or CIDR exactly as the router reports it.
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flag::deserialize"
    )]
    pub disabled: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flag::deserialize"
    )]
    pub dynamic: Option<bool>,
}

impl AddressListEntry {
    /// Minimal entry with only identity fields populated.
    pub fn new(id: impl Into<String>, list: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            list: list.into(),
            address: address.into(),
            comment: None,
            timeout: None,
            disabled: None,
            dynamic: None,
        }
    }
}

/// A single `/ip/firewall/filter` record.
///
/// `chain` and `action` are kept as free-form strings: routers carry
/// user-defined chains and actions beyond the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(rename = ".id", default)]
    pub id: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub action: String,
    #[serde(rename = "src-address", default, skip_serializing_if = "Option::is_none")]
    pub src_address: Option<String>,
    #[serde(rename = "dst-address", default, skip_serializing_if = "Option::is_none")]
    pub dst_address: Option<String>,
    #[serde(rename = "src-port", default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<String>,
    #[serde(rename = "dst-port", default, skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flag::deserialize"
    )]
    pub disabled: Option<bool>,
    #[serde(rename = "address-list", default, skip_serializing_if = "Option::is_none")]
    pub address_list: Option<String>,
    #[serde(rename = "src-address-list", default, skip_serializing_if = "Option::is_none")]
    pub src_address_list: Option<String>,
    #[serde(rename = "dst-address-list", default, skip_serializing_if = "Option::is_none")]
    pub dst_address_list: Option<String>,
}

impl FirewallRule {
    /// Minimal rule with only chain and action populated.
    pub fn new(id: impl Into<String>, chain: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chain: chain.into(),
            action: action.into(),
            src_address: None,
            dst_address: None,
            src_port: None,
            dst_port: None,
            protocol: None,
            comment: None,
            disabled: None,
            address_list: None,
            src_address_list: None,
            dst_address_list: None,
        }
    }
}

/// Both collections retrieved from one router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterData {
    #[serde(default)]
    pub address_lists: Vec<AddressListEntry>,
    #[serde(default)]
    pub firewall_rules: Vec<FirewallRule>,
}

/// Body of `POST /api/connect` on the intermediary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRequest {
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Envelope returned by `POST /api/connect`.
///
/// `{success: true, data: {...}}` or `{success: false, error: "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RouterData>,
}

impl ConnectResponse {
    pub fn ok(data: RouterData) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// RouterOS REST renders booleans as `"true"`/`"false"` strings; the
/// intermediary uses real JSON booleans. Accept both.
mod flag {
    use serde::de::{Error as _, Unexpected};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        match Option::<Raw>::deserialize(d)? {
            None => Ok(None),
            Some(Raw::Bool(b)) => Ok(Some(b)),
            Some(Raw::Text(s)) => match s.as_str() {
                "true" | "yes" => Ok(Some(true)),
                "false" | "no" => Ok(Some(false)),
                "" => Ok(None),
                other => Err(D::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a boolean or \"true\"/\"false\"",
                )),
            },
        }
    }
}
