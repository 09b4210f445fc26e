use indexmap::IndexMap;

use super::mac::MacAddress;

/// Per-request mapping from a device's display name to every hardware
/// address registered under it.
///
/// Names are not unique on a controller, so one name can map to several
/// addresses (a phone's Wi-Fi and a dock's Ethernet, or two devices an
/// operator gave the same alias). Both names and the addresses under each
/// name keep the order the controller reported them in; an address is
/// listed once per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex(IndexMap<String, Vec<MacAddress>>);

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mac` under `name`. Returns `false` if it was already there.
    pub fn insert(&mut self, name: impl Into<String>, mac: MacAddress) -> bool {
        let macs = self.0.entry(name.into()).or_default();
        if macs.contains(&mac) {
            return false;
        }
        macs.push(mac);
        true
    }

    /// Addresses registered under `name`, in controller order. Empty when
    /// the name is unknown.
    pub fn addresses(&self, name: &str) -> &[MacAddress] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, MacAddress)> for NameIndex {
    fn from_iter<I: IntoIterator<Item = (N, MacAddress)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (name, mac) in iter {
            index.insert(name, mac);
        }
        index
    }
}

impl<N: Into<String>> Extend<(N, MacAddress)> for NameIndex {
    fn extend<I: IntoIterator<Item = (N, MacAddress)>>(&mut self, iter: I) {
        for (name, mac) in iter {
            self.insert(name, mac);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mac(s: &str) -> MacAddress {
        MacAddress::new(s)
    }

    #[test]
    fn duplicate_names_merge_in_order() {
        let index: NameIndex = [
            ("alice-phone", mac("aa:00:00:00:00:01")),
            ("printer", mac("aa:00:00:00:00:09")),
            ("alice-phone", mac("aa:00:00:00:00:02")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            index.addresses("alice-phone"),
            &[mac("aa:00:00:00:00:01"), mac("aa:00:00:00:00:02")]
        );
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["alice-phone", "printer"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn duplicate_address_kept_once() {
        let mut index = NameIndex::new();
        assert!(index.insert("tv", mac("aa:00:00:00:00:03")));
        assert!(!index.insert("tv", mac("aa:00:00:00:00:03")));
        assert_eq!(index.addresses("tv").len(), 1);
    }

    #[test]
    fn unknown_name_is_empty() {
        let index = NameIndex::new();
        assert!(index.addresses("ghost-device").is_empty());
        assert!(index.is_empty());
    }
}
