//! The remote authentication seam.
//!
//! The limiter never talks to an auth backend itself. It calls an
//! [`Authenticator`] and only looks at whether the result is `Ok` or `Err`;
//! the error value is handed back to the caller untouched for messaging.

use async_trait::async_trait;

use crate::Credentials;

/// Implement this for your auth backend (HTTP client, SDK wrapper, etc.)
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Whatever a successful sign-in yields (session, token, user).
    type Session: Send;
    /// Categorized failure reason, surfaced to the caller unchanged.
    type Error: Send;

    async fn authenticate(&self, credentials: &Credentials) -> Result<Self::Session, Self::Error>;
}

#[cfg(any(test, feature = "mocks"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::Authenticator;
    use crate::Credentials;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockAuthError {
        InvalidCredentials,
        EmailNotConfirmed,
    }

    /// Accepts exactly one identifier/password pair and counts calls.
    pub struct MockAuthenticator {
        identifier: String,
        password: String,
        confirmed: bool,
        calls: AtomicUsize,
    }

    impl MockAuthenticator {
        pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
            Self {
                identifier: identifier.into(),
                password: password.into(),
                confirmed: true,
                calls: AtomicUsize::new(0),
            }
        }

        /// The account exists but has not confirmed its email yet.
        #[must_use]
        pub fn unconfirmed(mut self) -> Self {
            self.confirmed = false;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Authenticator for MockAuthenticator {
        type Session = String;
        type Error = MockAuthError;

        async fn authenticate(&self, credentials: &Credentials) -> Result<String, MockAuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if credentials.identifier != self.identifier
                || credentials.password.expose_secret() != self.password
            {
                return Err(MockAuthError::InvalidCredentials);
            }
            if !self.confirmed {
                return Err(MockAuthError::EmailNotConfirmed);
            }
            Ok(format!("session:{}", self.identifier))
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
pub use mock::{MockAuthError, MockAuthenticator};
