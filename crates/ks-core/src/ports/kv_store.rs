//! Key-value store port
//!
//! The host's persisted text store. The onboarding engine owns four slots in it
//! (see [`crate::onboarding::keys`]); implementations are provided by the
//! infrastructure layer (file-backed, in-memory).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyValueStoreError {
    #[error("Failed to read key {key}: {reason}")]
    ReadError { key: String, reason: String },
    #[error("Failed to write key {key}: {reason}")]
    WriteError { key: String, reason: String },
    #[error("Failed to remove key {key}: {reason}")]
    RemoveError { key: String, reason: String },
}

/// Persisted text store supplied by the host.
///
/// 宿主提供的持久化文本存储。
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Get the value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
