// Intermediary service client
//
// A single `POST /api/connect` hands host and credentials to a backend
// that talks to the router and answers with a pre-shaped envelope.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ConnectRequest, ConnectResponse, RouterData};
use crate::transport::TransportConfig;

/// Message used when the backend fails without saying why.
pub const GENERIC_CONNECT_ERROR: &str = "connection error";

/// HTTP client for the intermediary's `/api/connect` endpoint.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ProxyClient {
    /// Create a client for the backend rooted at `base_url`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/connect`, keeping any path prefix on the base.
    fn connect_url(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/connect"))?)
    }

    /// Ask the backend to connect to `host` and return its data.
    ///
    /// Non-2xx answers become [`Error::Backend`] carrying the server's
    /// `error` text when present, [`GENERIC_CONNECT_ERROR`] otherwise.
    /// `{success: false}` bodies become [`Error::Backend`] as well.
    pub async fn connect(
        &self,
        host: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<RouterData, Error> {
        let url = self.connect_url()?;
        debug!(host, "POST {}", url);

        let request = ConnectRequest {
            host: host.to_owned(),
            username: username.to_owned(),
            password: password.expose_secret().to_owned(),
        };

        let resp = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, self.timeout))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_transport(e, self.timeout))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ConnectResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_CONNECT_ERROR.to_owned());
            return Err(Error::Backend {
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: ConnectResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        match envelope {
            ConnectResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ConnectResponse { success: true, .. } => Err(Error::Deserialization {
                message: "success envelope without data".into(),
                body,
            }),
            ConnectResponse { error, .. } => Err(Error::Backend {
                status: None,
                message: error.unwrap_or_else(|| GENERIC_CONNECT_ERROR.to_owned()),
            }),
        }
    }
}
