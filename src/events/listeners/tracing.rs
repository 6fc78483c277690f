use async_trait::async_trait;

use crate::events::{Listener, ThrottleEvent};

/// Emits throttling events as tracing events.
///
/// Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &ThrottleEvent) {
        match event {
            ThrottleEvent::LockoutStarted { .. } | ThrottleEvent::StorageDegraded { .. } => {
                tracing::warn!(
                    target: "login_throttle::events",
                    event_name = event.name(),
                    ?event,
                    "throttle event"
                );
            }
            _ => {
                tracing::info!(
                    target: "login_throttle::events",
                    event_name = event.name(),
                    ?event,
                    "throttle event"
                );
            }
        }
    }
}
