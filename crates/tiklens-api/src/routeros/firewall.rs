// RouterOS firewall endpoints
//
// Both collections live under `/rest/ip/firewall/`. They are read-only
// here; no mutation endpoints are exposed.

use tracing::debug;

use crate::error::Error;
use crate::models::{AddressListEntry, FirewallRule, RouterData};
use crate::routeros::client::RouterOsClient;

impl RouterOsClient {
    /// List all address-list entries.
    ///
    /// `GET /rest/ip/firewall/address-list`
    pub async fn list_address_lists(&self) -> Result<Vec<AddressListEntry>, Error> {
        let url = self.rest_url("ip/firewall/address-list")?;
        debug!("listing address lists");
        self.get_collection(url).await
    }

    /// List all filter rules, in router order.
    ///
    /// `GET /rest/ip/firewall/filter`
    pub async fn list_firewall_rules(&self) -> Result<Vec<FirewallRule>, Error> {
        let url = self.rest_url("ip/firewall/filter")?;
        debug!("listing firewall rules");
        self.get_collection(url).await
    }

    /// Fetch both collections concurrently on an established session.
    pub async fn fetch_firewall_data(&self) -> Result<RouterData, Error> {
        let (address_lists, firewall_rules) =
            tokio::try_join!(self.list_address_lists(), self.list_firewall_rules())?;
        Ok(RouterData {
            address_lists,
            firewall_rules,
        })
    }
}
