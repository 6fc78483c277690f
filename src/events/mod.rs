//! Throttling events.
//!
//! The limiter dispatches an event whenever the attempt history or lock
//! state changes. With no listeners registered, dispatch is a no-op.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use login_throttle::register_event_listeners;
//! use login_throttle::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```
//!
//! # Custom Listeners
//!
//! ```rust,ignore
//! use login_throttle::events::{Listener, ThrottleEvent};
//! use async_trait::async_trait;
//!
//! struct LockoutBanner;
//!
//! #[async_trait]
//! impl Listener for LockoutBanner {
//!     async fn handle(&self, event: &ThrottleEvent) {
//!         if let ThrottleEvent::LockoutStarted { until, .. } = event {
//!             // show a banner until `until`
//!         }
//!     }
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::ThrottleEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
