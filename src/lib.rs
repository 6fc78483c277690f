//! Client-side login rate limiting.
//!
//! `login-throttle` decides, for every login submission, whether the attempt
//! may reach the remote authentication service. Failed attempts are recorded
//! in a persisted history; once [`MAX_ATTEMPTS`](config::MAX_ATTEMPTS)
//! failures land inside the [attempt window](config::ATTEMPT_WINDOW), further
//! submissions are rejected locally for [`BLOCK_DURATION`](config::BLOCK_DURATION).
//!
//! The limiter is advisory. The history lives in storage the client controls,
//! so it throttles honest users and casual guessing, not a determined
//! attacker. Pair it with server-side enforcement.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use login_throttle::{Credentials, FileStore, LoginOutcome, LoginRateLimiter};
//!
//! let store = Arc::new(FileStore::new("/var/lib/myapp/throttle")?);
//! let limiter = LoginRateLimiter::new(store);
//!
//! let credentials = Credentials::new("user@example.com", "hunter2");
//! match limiter.submit(&my_authenticator, &credentials).await {
//!     LoginOutcome::Authenticated(session) => { /* signed in */ }
//!     outcome => {
//!         if let Some(notice) = outcome.notice(limiter.now(), limiter.config()) {
//!             show(notice);
//!         }
//!     }
//! }
//! ```

use std::fmt;

pub mod auth;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod events;
pub mod rate_limit;

pub use auth::Authenticator;
#[cfg(any(test, feature = "mocks"))]
pub use auth::{MockAuthError, MockAuthenticator};
#[cfg(any(test, feature = "mocks"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use config::ThrottleConfig;
pub use credentials::{Credentials, SecretString};
pub use events::{ThrottleEvent, dispatch, register_event_listeners};
pub use rate_limit::{
    AttemptHistory, Evaluation, FileStore, InMemoryStore, KeyValueStore, LockState,
    LoginAttempt, LoginOutcome, LoginRateLimiter, evaluate,
};
#[cfg(any(test, feature = "mocks"))]
pub use rate_limit::UnavailableStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleError {
    /// The key-value store could not be read or written.
    StorageUnavailable(String),
    /// The attempt history could not be encoded.
    Serialization(String),
    /// The storage key cannot be used as an entry name.
    InvalidKey(String),
}

impl std::error::Error for ThrottleError {}

impl fmt::Display for ThrottleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThrottleError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {msg}"),
            ThrottleError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ThrottleError::InvalidKey(key) => write!(f, "Invalid storage key: {key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ThrottleError::StorageUnavailable("disabled".to_owned()).to_string(),
            "Storage unavailable: disabled"
        );
        assert_eq!(
            ThrottleError::InvalidKey("../x".to_owned()).to_string(),
            "Invalid storage key: ../x"
        );
    }
}
