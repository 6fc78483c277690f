//! Login credentials handed to the [`Authenticator`](crate::Authenticator).

use std::fmt;

/// A password or other secret that must not show up in logs.
///
/// `Debug` and `Display` print `[REDACTED]`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Use only where the raw value is required, e.g. the outbound auth call.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What the user typed into the login form.
///
/// The limiter never inspects these; the history is scoped to the store,
/// not to an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacted() {
        let secret = SecretString::new("hunter2");
        assert_eq!(format!("{secret:?}"), "SecretString([REDACTED])");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("user@example.com", "hunter2");
        let debug = format!("{credentials:?}");

        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
