//! Storage interface for checked rows
//!
//! A record is identified by (article, table, user, entity). Entity ids are
//! the sanitized row identifiers emitted by the table mutator.

use ahash::AHashMap;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Deleting a row that was never tracked
    #[error("No progress recorded for entity {entity_id}")]
    NotFound { entity_id: String },

    /// Backend failure
    #[error("Progress store failure: {0}")]
    Backend(String),
}

/// The (article, table, user) triple progress is grouped by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub article_id: u64,
    pub table_id: String,
    pub user_id: u64,
}

impl ProgressKey {
    #[must_use]
    pub fn new(article_id: u64, table_id: impl Into<String>, user_id: u64) -> Self {
        Self {
            article_id,
            table_id: table_id.into(),
            user_id,
        }
    }
}

/// Keyed CRUD store for checked rows
///
/// Implementations serialize concurrent writes for the same key.
pub trait ProgressStore: Send + Sync {
    /// Entity ids checked under `key`, oldest first
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on storage failure.
    fn get_progress(&self, key: &ProgressKey) -> StoreResult<Vec<String>>;

    /// Mark `entity_id` as checked; tracking twice is not an error
    ///
    /// # Errors
    ///
    /// [`StoreError::Backend`] on storage failure.
    fn track_progress(&self, key: &ProgressKey, entity_id: &str) -> StoreResult<()>;

    /// Unmark `entity_id`
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when nothing was tracked.
    fn delete_progress(&self, key: &ProgressKey, entity_id: &str) -> StoreResult<()>;
}

/// In-process [`ProgressStore`]
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: RwLock<AHashMap<ProgressKey, Vec<String>>>,
}

impl MemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked entities across all keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get_progress(&self, key: &ProgressKey) -> StoreResult<Vec<String>> {
        Ok(self.entries.read().get(key).cloned().unwrap_or_default())
    }

    fn track_progress(&self, key: &ProgressKey, entity_id: &str) -> StoreResult<()> {
        let mut entries = self.entries.write();
        let tracked = entries.entry(key.clone()).or_default();
        if !tracked.iter().any(|existing| existing == entity_id) {
            tracked.push(entity_id.to_string());
        }
        Ok(())
    }

    fn delete_progress(&self, key: &ProgressKey, entity_id: &str) -> StoreResult<()> {
        let mut entries = self.entries.write();
        let removed = entries.get_mut(key).and_then(|tracked| {
            let position = tracked.iter().position(|existing| existing == entity_id)?;
            tracked.remove(position);
            Some(tracked.is_empty())
        });

        match removed {
            Some(now_empty) => {
                if now_empty {
                    entries.remove(key);
                }
                Ok(())
            }
            None => {
                error!(
                    article = key.article_id,
                    table = %key.table_id,
                    user = key.user_id,
                    entity = entity_id,
                    "failed to delete progress"
                );
                Err(StoreError::NotFound {
                    entity_id: entity_id.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_is_idempotent() {
        let store = MemoryProgressStore::new();
        let key = ProgressKey::new(1, "t", 9);
        store.track_progress(&key, "row_0").unwrap();
        store.track_progress(&key, "row_0").unwrap();
        store.track_progress(&key, "Item_7").unwrap();
        assert_eq!(store.get_progress(&key).unwrap(), vec!["row_0", "Item_7"]);
    }

    #[test]
    fn test_keys_are_isolated_per_user() {
        let store = MemoryProgressStore::new();
        store.track_progress(&ProgressKey::new(1, "t", 1), "a").unwrap();
        assert!(store.get_progress(&ProgressKey::new(1, "t", 2)).unwrap().is_empty());
        assert!(store.get_progress(&ProgressKey::new(2, "t", 1)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_untracked_is_not_found() {
        let store = MemoryProgressStore::new();
        let key = ProgressKey::new(1, "t", 1);
        assert_eq!(
            store.delete_progress(&key, "a"),
            Err(StoreError::NotFound { entity_id: "a".into() })
        );
        store.track_progress(&key, "a").unwrap();
        store.delete_progress(&key, "a").unwrap();
        assert!(store.is_empty());
    }
}
