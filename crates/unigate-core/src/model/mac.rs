use std::fmt;

use serde::{Deserialize, Serialize};

/// Hardware address of a client's network interface.
///
/// Opaque to the core: equality is plain string equality. Normalization
/// happens once, where addresses enter from the controller
/// ([`MacAddress::normalized`]); [`MacAddress::new`] keeps its input as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Lowercase, colon-separated form (`aa:bb:cc:dd:ee:ff`) of any common
    /// notation (upper case, dash-separated).
    pub fn normalized(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase().replace('-', ":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
