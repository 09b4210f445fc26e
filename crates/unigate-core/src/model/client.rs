// ── Client inventory record ──

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// One device from the cached inventory snapshot.
///
/// Only the fields the gate reasons about are typed; the publisher's other
/// fields are carried in `extra` so a snapshot round-trips through
/// `GET /list` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub mac: MacAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Client {
    /// Assigned name, falling back to the DHCP hostname.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.hostname.as_deref())
    }
}
