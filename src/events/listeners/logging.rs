use async_trait::async_trait;

use crate::events::{Listener, ThrottleEvent};

/// Logs throttling events through the `log` crate.
///
/// Lockouts and storage degradation are logged at WARN or above; everything
/// else uses the configured level.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    fn level_for(&self, event: &ThrottleEvent) -> log::Level {
        match event {
            ThrottleEvent::LockoutStarted { .. } | ThrottleEvent::StorageDegraded { .. } => {
                log::Level::Warn.min(self.level)
            }
            _ => self.level,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &ThrottleEvent) {
        log::log!(
            target: "login_throttle::events",
            self.level_for(event),
            "event={} {:?}",
            event.name(),
            event
        );
    }
}
