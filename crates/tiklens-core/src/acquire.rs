// ── Acquisition strategies ──
//
// One `Acquire` implementation per deployment mode. Every failure path
// ends up as `ConnectionResult::Failure`; callers never see an `Err`.

use std::future::Future;

use tracing::{debug, info};

use tiklens_api::{ProxyClient, RouterOsClient, TransportConfig};

use crate::config::{AcquisitionConfig, AcquisitionMode};
use crate::error::CoreError;
use crate::model::Credentials;
use crate::result::{ConnectionResult, FailureKind};

/// Retrieves firewall data for one router.
pub trait Acquire {
    fn acquire(&self, credentials: &Credentials)
    -> impl Future<Output = ConnectionResult> + Send;
}

/// An empty address never leaves the process, whichever mode is active.
fn reject_blank_host(credentials: &Credentials) -> Option<ConnectionResult> {
    credentials.host.trim().is_empty().then(|| {
        ConnectionResult::failure(FailureKind::InvalidRequest, "router address is empty")
    })
}

/// Talks to the router's management endpoint.
///
/// Each attempt builds its own client so sessions never leak between
/// routers or retries.
#[derive(Debug, Clone)]
pub struct DirectAcquirer {
    auth_port: u16,
    transport: TransportConfig,
}

impl DirectAcquirer {
    pub fn new(auth_port: u16, transport: TransportConfig) -> Self {
        Self {
            auth_port,
            transport,
        }
    }
}

impl Acquire for DirectAcquirer {
    async fn acquire(&self, credentials: &Credentials) -> ConnectionResult {
        if let Some(failure) = reject_blank_host(credentials) {
            return failure;
        }
        debug!(host = %credentials.host, port = self.auth_port, "direct acquisition");
        let client = match RouterOsClient::new(&credentials.host, self.auth_port, &self.transport)
        {
            Ok(client) => client,
            Err(e) => return ConnectionResult::from(Err(e)),
        };
        client
            .connect(&credentials.username, &credentials.password)
            .await
            .into()
    }
}

/// Delegates to an intermediary service.
#[derive(Debug, Clone)]
pub struct ProxiedAcquirer {
    client: ProxyClient,
}

impl ProxiedAcquirer {
    pub fn new(client: ProxyClient) -> Self {
        Self { client }
    }
}

impl Acquire for ProxiedAcquirer {
    async fn acquire(&self, credentials: &Credentials) -> ConnectionResult {
        if let Some(failure) = reject_blank_host(credentials) {
            return failure;
        }
        debug!(
            host = %credentials.host,
            backend = %self.client.base_url(),
            "proxied acquisition"
        );
        self.client
            .connect(
                &credentials.host,
                &credentials.username,
                &credentials.password,
            )
            .await
            .into()
    }
}

/// The strategy selected by deployment configuration.
#[derive(Debug, Clone)]
pub enum Acquirer {
    Direct(DirectAcquirer),
    Proxied(ProxiedAcquirer),
}

impl Acquirer {
    /// Build the strategy once from configuration.
    ///
    /// Only the proxied client is built eagerly; a bad TLS setup for it
    /// is reported here as [`CoreError::Config`].
    pub fn from_config(config: &AcquisitionConfig) -> Result<Self, CoreError> {
        let transport = config.build_transport();
        let acquirer = match &config.mode {
            AcquisitionMode::Direct { auth_port } => {
                Self::Direct(DirectAcquirer::new(*auth_port, transport))
            }
            AcquisitionMode::Proxied { backend } => {
                let client = ProxyClient::new(backend.clone(), &transport).map_err(|e| {
                    CoreError::Config {
                        message: format!("cannot build intermediary client: {e}"),
                    }
                })?;
                Self::Proxied(ProxiedAcquirer::new(client))
            }
        };
        info!(mode = acquirer.mode_name(), "acquisition strategy ready");
        Ok(acquirer)
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Proxied(_) => "proxied",
        }
    }
}

impl Acquire for Acquirer {
    async fn acquire(&self, credentials: &Credentials) -> ConnectionResult {
        match self {
            Self::Direct(direct) => direct.acquire(credentials).await,
            Self::Proxied(proxied) => proxied.acquire(credentials).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RouterSlot;

    #[tokio::test]
    async fn empty_host_fails_without_network() {
        let acquirer = Acquirer::from_config(&AcquisitionConfig::default()).unwrap();
        let creds = Credentials::for_slot(RouterSlot::Primary);

        let result = acquirer.acquire(&creds).await;
        let ConnectionResult::Failure { kind, .. } = result else {
            panic!("empty host must fail");
        };
        assert_eq!(kind, FailureKind::InvalidRequest);
    }

    #[test]
    fn mode_follows_config() {
        let config = AcquisitionConfig {
            mode: AcquisitionMode::Proxied {
                backend: "http://localhost:5000".parse().unwrap(),
            },
            ..AcquisitionConfig::default()
        };
        let acquirer = Acquirer::from_config(&config).unwrap();
        assert_eq!(acquirer.mode_name(), "proxied");
    }
}
