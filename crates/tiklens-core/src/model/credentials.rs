// ── Router identity and credentials ──

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// One of the two router positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterSlot {
    Primary,
    Secondary,
}

impl RouterSlot {
    pub const ALL: [RouterSlot; 2] = [RouterSlot::Primary, RouterSlot::Secondary];

    /// Stable identifier carried in [`Credentials::id`].
    pub fn id(self) -> &'static str {
        match self {
            Self::Primary => "1",
            Self::Secondary => "2",
        }
    }

    /// Display name used when none is configured.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Primary => "Primary router",
            Self::Secondary => "Secondary router",
        }
    }
}

impl fmt::Display for RouterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

impl FromStr for RouterSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "1" => Ok(Self::Primary),
            "secondary" | "2" => Ok(Self::Secondary),
            other => Err(format!("expected 'primary' or 'secondary', got '{other}'")),
        }
    }
}

/// Connection parameters for one router.
///
/// Held in memory only. The password is exposed when sent to the router
/// (or intermediary) and when serialized into an export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub id: String,
    pub name: String,
    pub host: String,
    pub username: String,
    #[serde(with = "password")]
    pub password: SecretString,
}

impl Credentials {
    /// Blank credentials for a slot, named after it.
    pub fn for_slot(slot: RouterSlot) -> Self {
        Self {
            id: slot.id().into(),
            name: slot.default_name().into(),
            host: String::new(),
            username: String::new(),
            password: SecretString::from(String::new()),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_login(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = username.into();
        self.password = password;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// `host` and `username` are both present.
    pub fn is_complete(&self) -> bool {
        !self.host.trim().is_empty() && !self.username.trim().is_empty()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.host == other.host
            && self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

impl Eq for Credentials {}

mod password {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
        String::deserialize(d).map(SecretString::from)
    }
}
