// RouterOS REST HTTP client
//
// Wraps `reqwest::Client` with RouterOS-specific URL construction and
// collection decoding. Endpoint groups (auth, firewall) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::net::Ipv6Addr;
use std::time::Duration;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::error::Error;
use crate::models::RouterData;
use crate::transport::TransportConfig;

/// Default port of the router's management login endpoint.
pub const DEFAULT_AUTH_PORT: u16 = 8728;

/// Raw HTTP client for a single router's REST management interface.
///
/// Session continuity relies on the cookie jar: [`login`](Self::login)
/// establishes the session, every later request replays the cookie.
#[derive(Debug, Clone)]
pub struct RouterOsClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl RouterOsClient {
    /// Create a client for `http://{host}:{port}`.
    ///
    /// A cookie jar is attached if the transport config lacks one (the
    /// session cookie is mandatory). An empty or malformed host fails here
    /// with [`Error::InvalidUrl`] or [`Error::InvalidHost`], before any
    /// network traffic.
    pub fn new(host: &str, port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = router_base_url(host, port)?;
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
        })
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Log in, then fetch address lists and filter rules.
    ///
    /// The two retrievals run concurrently once the session exists; either
    /// failing fails the whole call. A failed login never reaches them.
    pub async fn connect(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<RouterData, Error> {
        self.login(username, password).await?;
        let data = self.fetch_firewall_data().await?;
        info!(
            address_lists = data.address_lists.len(),
            firewall_rules = data.firewall_rules.len(),
            "router data retrieved"
        );
        Ok(data)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/login`
    pub(crate) fn login_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("/login")?)
    }

    /// `{base}/rest/{path}`
    pub(crate) fn rest_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("/rest/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn transport_err(&self, err: reqwest::Error) -> Error {
        Error::from_transport(err, self.timeout)
    }

    /// GET a collection resource.
    ///
    /// A JSON payload that is not an array decodes to an empty collection.
    /// Invalid JSON, or array items of the wrong shape, are errors.
    pub(crate) async fn get_collection<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_err(e))?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Backend {
                status: Some(status.as_u16()),
                message: format!("HTTP {status} from {}: {}", url.path(), preview(&body)),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_err(e))?;
        decode_collection(&body)
    }
}

/// Build `http://{host}:{port}/`, bracketing bare IPv6 literals.
///
/// The port always comes from `port`. Hosts that carry their own port, a
/// path, or userinfo are rejected rather than silently rewritten.
fn router_base_url(host: &str, port: u16) -> Result<Url, Error> {
    let host = host.trim();
    let invalid = |reason: &'static str| Error::InvalidHost {
        host: host.to_owned(),
        reason,
    };
    if host.contains(['/', '?', '#', '@']) || host.contains(char::is_whitespace) {
        return Err(invalid("expected a hostname or IP address"));
    }

    let full = if let Some(inner) = host.strip_prefix('[') {
        let literal = inner
            .strip_suffix(']')
            .ok_or_else(|| invalid("set the port with --auth-port"))?;
        literal
            .parse::<Ipv6Addr>()
            .map_err(|_| invalid("not an IPv6 literal"))?;
        format!("http://{host}:{port}/")
    } else if host.contains(':') {
        host.parse::<Ipv6Addr>()
            .map_err(|_| invalid("set the port with --auth-port"))?;
        format!("http://[{host}]:{port}/")
    } else {
        format!("http://{host}:{port}/")
    };
    Ok(Url::parse(&full)?)
}

fn decode_collection<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, Error> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        })?;

    if !value.is_array() {
        debug!("collection payload is not an array, treating as empty");
        return Ok(Vec::new());
    }

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::AddressListEntry;

    #[test]
    fn empty_host_is_invalid_url() {
        let result = router_base_url("", DEFAULT_AUTH_PORT);
        assert!(matches!(result, Err(Error::InvalidUrl(_))), "got {result:?}");
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let url = router_base_url("fe80::1", 8728).unwrap();
        assert_eq!(url.as_str(), "http://[fe80::1]:8728/");
        let url = router_base_url("[fe80::1]", 8728).unwrap();
        assert_eq!(url.as_str(), "http://[fe80::1]:8728/");
    }

    #[test]
    fn host_with_port_is_rejected() {
        for host in ["10.0.0.1:8080", "router.lan:80", "[fe80::1]:8080"] {
            let result = router_base_url(host, DEFAULT_AUTH_PORT);
            assert!(
                matches!(result, Err(Error::InvalidHost { .. })),
                "{host}: got {result:?}"
            );
        }
    }

    #[test]
    fn host_with_path_or_userinfo_is_rejected() {
        for host in ["router/path", "10.0.0.1/24", "admin@10.0.0.1", "router lan"] {
            let result = router_base_url(host, DEFAULT_AUTH_PORT);
            assert!(
                matches!(result, Err(Error::InvalidHost { .. })),
                "{host}: got {result:?}"
            );
        }
    }

    #[test]
    fn object_payload_decodes_as_empty() {
        let items: Vec<AddressListEntry> = decode_collection(r#"{"message":"nope"}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn invalid_json_is_a_deserialization_error() {
        let result: Result<Vec<AddressListEntry>, _> = decode_collection("<html>");
        assert!(matches!(result, Err(Error::Deserialization { .. })));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
    }
}
