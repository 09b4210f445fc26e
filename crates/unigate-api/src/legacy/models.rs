// Legacy API response types
//
// Fields use `#[serde(default)]` liberally because the API is inconsistent
// about field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Known client (user) ──────────────────────────────────────────────

/// Known client record from `rest/user`.
///
/// `name` is the alias an operator assigned in the controller UI;
/// `hostname` is whatever the device announced over DHCP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUserEntry {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LegacyUserEntry {
    /// The name an operator would use for this device: the assigned alias,
    /// falling back to the DHCP hostname. Blank values count as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.hostname.as_deref().filter(|h| !h.trim().is_empty()))
    }
}
