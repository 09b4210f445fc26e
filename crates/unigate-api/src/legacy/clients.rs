// Legacy API client (station) endpoints
//
// Known-client listing via rest/user and block/unblock via cmd/stamgr.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::LegacyUserEntry;

impl LegacyClient {
    /// List every client the controller knows about, connected or not.
    ///
    /// `GET /api/s/{site}/rest/user`
    pub async fn list_known_clients(&self) -> Result<Vec<LegacyUserEntry>, Error> {
        let url = self.site_url("rest/user")?;
        debug!("listing known clients");
        self.get(url).await
    }

    /// Block a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`
    pub async fn block_client(&self, mac: &str) -> Result<(), Error> {
        self.stamgr("block-sta", mac).await
    }

    /// Unblock a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_client(&self, mac: &str) -> Result<(), Error> {
        self.stamgr("unblock-sta", mac).await
    }

    async fn stamgr(&self, cmd: &str, mac: &str) -> Result<(), Error> {
        let url = self.site_url("cmd/stamgr")?;
        debug!(cmd, mac, "station manager command");
        let _: Vec<serde_json::Value> = self
            .post(
                url,
                &json!({
                    "cmd": cmd,
                    "mac": mac,
                }),
            )
            .await?;
        Ok(())
    }
}
