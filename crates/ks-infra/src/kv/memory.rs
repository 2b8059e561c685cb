//! In-memory key-value store, used by the CLI dry runs and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use ks_core::ports::{KeyValueStoreError, KeyValueStorePort};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, e.g. with a hand-written draft.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
