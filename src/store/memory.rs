use std::collections::HashMap;
use std::sync::RwLock;

use super::KeyValueStore;
use crate::AuthError;

/// In-process store.
///
/// Nothing survives a restart, so this is meant for tests and for hosts that
/// only need throttling within a single run. A quota, when set, caps the sum
/// of key and value lengths in bytes, the way browser storage caps an origin.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently held, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[allow(clippy::significant_drop_tightening)]
impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuthError::StorageError("Failed to acquire lock".to_owned()))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuthError::StorageError("Failed to acquire lock".to_owned()))?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();

            if others + key.len() + value.len() > quota {
                return Err(AuthError::QuotaExceeded);
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuthError::StorageError("Failed to acquire lock".to_owned()))?;

        entries.remove(key);
        Ok(())
    }
}
