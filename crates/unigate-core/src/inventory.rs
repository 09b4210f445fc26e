// ── Cache bridge reader ──
//
// The client inventory is published into a NATS JetStream key/value bucket
// by a separate poller. This side only ever reads it, and never needs a
// controller session to do so.

use std::future::Future;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, error};

use crate::error::CoreError;
use crate::model::Client;

/// Default bucket the inventory publisher writes to.
pub const DEFAULT_BUCKET: &str = "unifi";
/// Key holding the snapshot of currently active clients.
pub const ACTIVE_KEY: &str = "active";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cannot connect to cache at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("cache bucket '{bucket}' unavailable: {reason}")]
    Bucket { bucket: String, reason: String },

    #[error("cache read of {bucket}/{key} failed: {reason}")]
    Read {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("no cache entry for {bucket}/{key}")]
    MissingKey { bucket: String, key: String },

    #[error("cannot decode cached inventory: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only access to a bucketed key/value cache.
pub trait CacheBridge: Send + Sync {
    fn get(&self, bucket: &str, key: &str)
    -> impl Future<Output = Result<Bytes, CacheError>> + Send;
}

/// [`CacheBridge`] over NATS JetStream key/value.
///
/// Connects per read, the same way every control request opens its own
/// controller session.
#[derive(Debug, Clone)]
pub struct NatsKvBridge {
    url: String,
}

impl NatsKvBridge {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl CacheBridge for NatsKvBridge {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, CacheError> {
        debug!(url = %self.url, bucket, key, "reading cache entry");

        let client = async_nats::connect(self.url.as_str())
            .await
            .map_err(|e| CacheError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        let jetstream = async_nats::jetstream::new(client);

        let store = jetstream
            .get_key_value(bucket)
            .await
            .map_err(|e| CacheError::Bucket {
                bucket: bucket.to_owned(),
                reason: e.to_string(),
            })?;

        store
            .get(key)
            .await
            .map_err(|e| CacheError::Read {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| CacheError::MissingKey {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })
    }
}

/// Fetches and decodes the inventory snapshot.
#[derive(Debug, Clone)]
pub struct InventoryReader<B> {
    bridge: B,
    bucket: String,
    key: String,
}

impl<B: CacheBridge> InventoryReader<B> {
    pub fn new(bridge: B, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bridge,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Reader for the well-known `unifi`/`active` entry.
    pub fn active(bridge: B) -> Self {
        Self::new(bridge, DEFAULT_BUCKET, ACTIVE_KEY)
    }

    /// One read, one decode. A JSON `null` payload is an empty inventory.
    pub async fn fetch_inventory(&self) -> Result<Vec<Client>, CoreError> {
        let payload = self
            .bridge
            .get(&self.bucket, &self.key)
            .await
            .map_err(|e| {
                error!(bucket = %self.bucket, key = %self.key, error = %e, "list: unable to get clients");
                CoreError::Cache(e)
            })?;

        let clients: Option<Vec<Client>> = serde_json::from_slice(&payload).map_err(|e| {
            error!(bucket = %self.bucket, key = %self.key, error = %e, "list: unable to decode clients");
            CoreError::Cache(CacheError::Decode(e))
        })?;

        let clients = clients.unwrap_or_default();
        debug!(count = clients.len(), "fetched client inventory");
        Ok(clients)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    struct MemoryBridge(HashMap<(String, String), Bytes>);

    impl MemoryBridge {
        fn with(bucket: &str, key: &str, body: &str) -> Self {
            let mut map = HashMap::new();
            map.insert(
                (bucket.to_owned(), key.to_owned()),
                Bytes::from(body.to_owned()),
            );
            Self(map)
        }
    }

    impl CacheBridge for MemoryBridge {
        async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, CacheError> {
            self.0
                .get(&(bucket.to_owned(), key.to_owned()))
                .cloned()
                .ok_or_else(|| CacheError::MissingKey {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                })
        }
    }

    #[tokio::test]
    async fn decodes_active_snapshot() {
        let body = json!([
            { "mac": "aa:bb:cc:00:00:01", "name": "alice-phone" },
            { "mac": "aa:bb:cc:00:00:02", "hostname": "printer", "is_wired": true }
        ])
        .to_string();
        let reader = InventoryReader::active(MemoryBridge::with("unifi", "active", &body));

        let clients = reader.fetch_inventory().await.unwrap();

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].display_name(), Some("alice-phone"));
        assert_eq!(clients[1].extra.get("is_wired"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn null_payload_is_empty() {
        let reader = InventoryReader::active(MemoryBridge::with("unifi", "active", "null"));
        assert!(reader.fetch_inventory().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn garbage_payload_is_decode_error() {
        let reader = InventoryReader::active(MemoryBridge::with("unifi", "active", "{not json"));
        let err = reader.fetch_inventory().await.unwrap_err();
        assert!(matches!(err, CoreError::Cache(CacheError::Decode(_))));
    }

    #[tokio::test]
    async fn missing_key_surfaces() {
        let reader = InventoryReader::new(
            MemoryBridge::with("unifi", "active", "[]"),
            "unifi",
            "stale",
        );
        let err = reader.fetch_inventory().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Cache(CacheError::MissingKey { ref key, .. }) if key == "stale"
        ));
    }

    #[tokio::test]
    async fn unreachable_nats_is_connect_error() {
        let bridge = NatsKvBridge::new("nats://127.0.0.1:9");
        let err = bridge.get("unifi", "active").await.unwrap_err();
        assert!(matches!(err, CacheError::Connect { .. }), "got {err:?}");
    }
}
