//! The record-store seam for secrets, plus an in-process implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors surfaced by a record-store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to complete the call.
    #[error("record store error: {0}")]
    Backend(String),
}

/// One stored secret row, keyed by `(owner_id, key_name)`.
///
/// `value` is always an envelope string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecret {
    pub owner_id: String,
    pub key_name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row-level access to the secret table.
///
/// Implementations only move strings; they never see plaintext.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// Fetch the row for `(owner_id, key_name)`, if any.
    async fn fetch(&self, owner_id: &str, key_name: &str)
        -> Result<Option<StoredSecret>, StoreError>;

    /// Fetch every row belonging to `owner_id`.
    async fn fetch_all(&self, owner_id: &str) -> Result<Vec<StoredSecret>, StoreError>;

    /// List the key names present for `owner_id` without reading values.
    async fn list_keys(&self, owner_id: &str) -> Result<Vec<String>, StoreError>;

    /// Insert or fully replace the row for `(row.owner_id, row.key_name)`.
    async fn upsert(&self, row: StoredSecret) -> Result<(), StoreError>;

    /// Remove the row for `(owner_id, key_name)`. Absent rows are not an error.
    async fn remove(&self, owner_id: &str, key_name: &str) -> Result<(), StoreError>;
}

type RowKey = (String, String);

/// In-process [`SecretRepository`] backed by a `HashMap`.
///
/// Clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<HashMap<RowKey, StoredSecret>>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows across all owners.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns `true` if no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

fn row_key(owner_id: &str, key_name: &str) -> RowKey {
    (owner_id.to_owned(), key_name.to_owned())
}

#[async_trait]
impl SecretRepository for MemoryRepository {
    async fn fetch(
        &self,
        owner_id: &str,
        key_name: &str,
    ) -> Result<Option<StoredSecret>, StoreError> {
        let table = self.inner.read().await;
        Ok(table.get(&row_key(owner_id, key_name)).cloned())
    }

    async fn fetch_all(&self, owner_id: &str) -> Result<Vec<StoredSecret>, StoreError> {
        let table = self.inner.read().await;
        let mut rows: Vec<StoredSecret> = table
            .values()
            .filter(|row| row.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.key_name.cmp(&b.key_name));
        Ok(rows)
    }

    async fn list_keys(&self, owner_id: &str) -> Result<Vec<String>, StoreError> {
        let table = self.inner.read().await;
        let mut keys: Vec<String> = table
            .keys()
            .filter(|(owner, _)| owner == owner_id)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn upsert(&self, mut row: StoredSecret) -> Result<(), StoreError> {
        let mut table = self.inner.write().await;
        let key = row_key(&row.owner_id, &row.key_name);
        if let Some(existing) = table.get(&key) {
            row.created_at = existing.created_at;
        }
        table.insert(key, row);
        Ok(())
    }

    async fn remove(&self, owner_id: &str, key_name: &str) -> Result<(), StoreError> {
        let mut table = self.inner.write().await;
        table.remove(&row_key(owner_id, key_name));
        Ok(())
    }
}
