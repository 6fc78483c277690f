use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::ThrottleError;

/// String key-value persistence for the attempt history.
///
/// Modeled on browser local storage: one serialized value per key, scoped
/// to the client rather than to a user identity. Implement this for any
/// durable client-side storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ThrottleError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), ThrottleError>;

    /// removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), ThrottleError>;
}

/// Process-lifetime storage; nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Writers never leave the map half-updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ThrottleError> {
        Ok(self.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ThrottleError> {
        self.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ThrottleError> {
        self.write().remove(key);
        Ok(())
    }
}
