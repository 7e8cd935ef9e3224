//! In-memory storage implementation for testing.

use crate::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory storage for testing.
///
/// Clones share the same data, which lets two repositories observe each
/// other's writes the way two processes sharing one index file would.
/// Writes can be made to fail on demand to exercise rollback paths.
#[derive(Clone)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    /// Successful writes left before a single failure; `usize::MAX` is off.
    fail_after: Arc<AtomicUsize>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            data: Arc::default(),
            fail_writes: Arc::default(),
            fail_after: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }
}

impl MemoryStorage {
    /// Create a new in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `write` fail with an IO error (or stop failing).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Let `successes` writes through, fail the next one, then recover.
    pub fn fail_once_after(&self, successes: usize) {
        self.fail_after.store(successes, Ordering::SeqCst);
    }

    fn take_write_failure(&self) -> bool {
        if self.fail_writes.load(Ordering::SeqCst) {
            return true;
        }
        let previous = self
            .fail_after
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                usize::MAX => None,
                0 => Some(usize::MAX),
                n => Some(n - 1),
            });
        previous == Ok(0)
    }

    /// Convert a key slice to a storage key string.
    fn key_to_string(key: &[&str]) -> String {
        key.join("/")
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read<T: DeserializeOwned + Send>(&self, key: &[&str]) -> StorageResult<Option<T>> {
        let key_str = Self::key_to_string(key);
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        match data.get(&key_str) {
            Some(json) => {
                let value: T = serde_json::from_str(json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + Send + Sync>(
        &self,
        key: &[&str],
        value: &T,
    ) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::invalid_key("Key cannot be empty"));
        }
        if self.take_write_failure() {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }

        let key_str = Self::key_to_string(key);
        let json = serde_json::to_string(value)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        data.insert(key_str, json);

        Ok(())
    }

    async fn remove(&self, key: &[&str]) -> StorageResult<()> {
        let key_str = Self::key_to_string(key);
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        data.remove(&key_str);
        Ok(())
    }

    async fn exists(&self, key: &[&str]) -> StorageResult<bool> {
        let key_str = Self::key_to_string(key);
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(data.contains_key(&key_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        storage.write(&["test", "data"], &data).await.unwrap();

        let read: Option<TestData> = storage.read(&["test", "data"]).await.unwrap();
        assert_eq!(read, Some(data.clone()));

        assert!(storage.exists(&["test", "data"]).await.unwrap());
        assert!(!storage.exists(&["nonexistent"]).await.unwrap());

        storage.remove(&["test", "data"]).await.unwrap();
        assert!(!storage.exists(&["test", "data"]).await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.write(&["versions"], &TestData::default()).await.unwrap();
        assert!(other.exists(&["versions"]).await.unwrap());
    }

    #[tokio::test]
    async fn test_fail_writes_keeps_previous_value() {
        let storage = MemoryStorage::new();
        let first = TestData {
            name: "first".to_string(),
            value: 1,
        };
        storage.write(&["key"], &first).await.unwrap();

        storage.set_fail_writes(true);
        let second = TestData {
            name: "second".to_string(),
            value: 2,
        };
        assert!(matches!(
            storage.write(&["key"], &second).await,
            Err(StorageError::Io(_))
        ));

        let result: Option<TestData> = storage.read(&["key"]).await.unwrap();
        assert_eq!(result, Some(first));

        storage.set_fail_writes(false);
        storage.write(&["key"], &second).await.unwrap();
    }

    #[tokio::test]
    async fn test_fail_once_after() {
        let storage = MemoryStorage::new();
        storage.fail_once_after(2);

        storage.write(&["a"], &1).await.unwrap();
        storage.write(&["b"], &2).await.unwrap();
        assert!(storage.write(&["c"], &3).await.is_err());
        storage.write(&["c"], &4).await.unwrap();

        let c: Option<i32> = storage.read(&["c"]).await.unwrap();
        assert_eq!(c, Some(4));
    }

    #[tokio::test]
    async fn test_memory_storage_remove_nonexistent() {
        let storage = MemoryStorage::new();
        storage.remove(&["does", "not", "exist"]).await.unwrap();
    }
}
