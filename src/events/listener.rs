use async_trait::async_trait;

use super::ThrottleEvent;

/// Handles throttling events, e.g. to surface a lockout banner or feed
/// client analytics.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event; match on the variant to filter.
    async fn handle(&self, event: &ThrottleEvent);
}
