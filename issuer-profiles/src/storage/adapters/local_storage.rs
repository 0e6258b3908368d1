use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::storage::repository::*;

/// In-memory store. Keys are kept ordered so prefix scans are range reads.
#[derive(Clone)]
pub struct LocalStorage {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn with_entries(entries: Vec<(String, Vec<u8>)>) -> Self {
        let storage = Self::new();
        if let Ok(mut map) = storage.entries.write() {
            map.extend(entries);
        }
        storage
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::QueryFailed("local storage lock poisoned".to_string())
}

#[async_trait::async_trait]
impl KeyValueStore for LocalStorage {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::DataNotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
