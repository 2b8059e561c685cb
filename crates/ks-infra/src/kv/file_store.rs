//! File-based key-value store
//!
//! This module provides a file-based implementation of the KeyValueStorePort,
//! persisting each key as one small text file in the application data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use ks_core::ports::{KeyValueStoreError, KeyValueStorePort};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const DEFAULT_STORE_DIR: &str = "kv";

pub struct FileKeyValueStore {
    root_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create store rooted at a custom directory
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    /// Create store with defaults under the base data directory
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            root_dir: base_dir.join(DEFAULT_STORE_DIR),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` are replaced so a
    /// key can never escape the store directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root_dir.join(format!("{file_name}.value"))
    }

    async fn ensure_root_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root_dir)
            .await
            .with_context(|| format!("create store dir failed: {}", self.root_dir.display()))
    }

    /// Writes `content` to a temp file next to `path`, syncs it, then renames it
    /// over the target. Readers see either the old or the new value.
    async fn atomic_write(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        self.ensure_root_dir().await?;

        let tmp_path = path.with_extension("value.tmp");
        let mut file = fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("create temp file failed: {}", tmp_path.display()))?;
        file.write_all(content.as_bytes())
            .await
            .with_context(|| format!("write temp file failed: {}", tmp_path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("sync temp file failed: {}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "rename temp file to target failed: {} -> {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::ReadError {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let path = self.path_for(key);
        self.atomic_write(&path, value)
            .await
            .map_err(|err| KeyValueStoreError::WriteError {
                key: key.to_string(),
                reason: format!("{err:#}"),
            })?;
        debug!(key, bytes = value.len(), "kv value written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "kv value removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::RemoveError {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}
