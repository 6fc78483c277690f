use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::store::KeyValueStore;
use crate::ThrottleError;

/// Storage that rejects every operation, like disabled browser storage.
pub struct UnavailableStore {
    pub calls: AtomicUsize,
}

impl UnavailableStore {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn fail(&self) -> ThrottleError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ThrottleError::StorageUnavailable("storage is disabled".to_owned())
    }
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, ThrottleError> {
        Err(self.fail())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), ThrottleError> {
        Err(self.fail())
    }

    async fn remove(&self, _key: &str) -> Result<(), ThrottleError> {
        Err(self.fail())
    }
}
