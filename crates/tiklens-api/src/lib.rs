//! Async HTTP clients for RouterOS firewall data.
//!
//! Two acquisition surfaces share one wire model:
//!
//! - **[`RouterOsClient`]**: talks to the router directly. Cookie session
//!   via `GET`/`POST /login`, then `/rest/ip/firewall/address-list` and
//!   `/rest/ip/firewall/filter` fetched concurrently.
//! - **[`ProxyClient`]**: delegates to an intermediary service with a single
//!   `POST /api/connect` and unwraps its `{success, data | error}` envelope.
//!
//! Both return [`RouterData`] or a typed [`Error`].

pub mod error;
pub mod models;
pub mod proxy;
pub mod routeros;
pub mod transport;

pub use error::Error;
pub use models::{AddressListEntry, ConnectRequest, ConnectResponse, FirewallRule, RouterData};
pub use proxy::client::{GENERIC_CONNECT_ERROR, ProxyClient};
pub use routeros::client::{DEFAULT_AUTH_PORT, RouterOsClient};
pub use transport::{TlsMode, TransportConfig};
