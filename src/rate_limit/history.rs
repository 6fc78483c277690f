use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::attempt::LoginAttempt;
use super::store::KeyValueStore;
use crate::events::{ThrottleEvent, dispatch};
use crate::{Clock, ThrottleError};

/// The persisted attempt list, stored as a JSON array under one key.
///
/// Every read and write is mirrored in memory. When the store fails, the
/// history switches to the mirror for the rest of its lifetime instead of
/// failing the login flow.
pub struct AttemptHistory {
    store: Arc<dyn KeyValueStore>,
    key: String,
    clock: Arc<dyn Clock>,
    mirror: Mutex<Vec<LoginAttempt>>,
    degraded: AtomicBool,
}

impl AttemptHistory {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            clock,
            mirror: Mutex::new(Vec::new()),
            degraded: AtomicBool::new(false),
        }
    }

    /// True once the store has failed and attempts are only kept in memory.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    pub async fn load(&self) -> Vec<LoginAttempt> {
        if self.is_degraded() {
            return self.mirror().clone();
        }

        match self.store.get(&self.key).await {
            Ok(Some(raw)) => {
                let attempts = match serde_json::from_str::<Vec<LoginAttempt>>(&raw) {
                    Ok(attempts) => attempts,
                    Err(e) => {
                        log::warn!(target: "login_throttle", "msg=\"discarding unreadable attempt history\", key=\"{}\", error=\"{e}\"", self.key);
                        Vec::new()
                    }
                };
                self.mirror().clone_from(&attempts);
                attempts
            }
            Ok(None) => {
                self.mirror().clear();
                Vec::new()
            }
            Err(e) => {
                self.degrade(e).await;
                self.mirror().clone()
            }
        }
    }

    pub async fn save(&self, attempts: &[LoginAttempt]) {
        *self.mirror() = attempts.to_vec();

        if self.is_degraded() {
            return;
        }

        let raw = match serde_json::to_string(attempts) {
            Ok(raw) => raw,
            Err(e) => {
                self.degrade(ThrottleError::Serialization(e.to_string())).await;
                return;
            }
        };

        if let Err(e) = self.store.set(&self.key, &raw).await {
            self.degrade(e).await;
        }
    }

    pub async fn clear(&self) {
        self.mirror().clear();

        if self.is_degraded() {
            return;
        }

        if let Err(e) = self.store.remove(&self.key).await {
            self.degrade(e).await;
        }
    }

    fn mirror(&self) -> MutexGuard<'_, Vec<LoginAttempt>> {
        self.mirror.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn degrade(&self, error: ThrottleError) {
        if self.degraded.swap(true, Ordering::SeqCst) {
            return;
        }

        log::warn!(target: "login_throttle", "msg=\"attempt history storage unavailable, counting in memory\", key=\"{}\", error=\"{error}\"", self.key);

        dispatch(ThrottleEvent::StorageDegraded {
            reason: error.to_string(),
            at: self.clock.now(),
        })
        .await;
    }
}

impl std::fmt::Debug for AttemptHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptHistory")
            .field("key", &self.key)
            .field("degraded", &self.is_degraded())
            .finish_non_exhaustive()
    }
}
