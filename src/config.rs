//! Throttling constants and the configuration built from them.
//!
//! The limiter runs with fixed values; [`ThrottleConfig::default()`] mirrors
//! the constants below and is what [`LoginRateLimiter::new`] uses.
//!
//! [`LoginRateLimiter::new`]: crate::LoginRateLimiter::new

use chrono::Duration;

/// Failed attempts allowed inside [`ATTEMPT_WINDOW`] before lockout.
pub const MAX_ATTEMPTS: u32 = 5;

/// Sliding window over which failed attempts are counted.
pub const ATTEMPT_WINDOW: Duration = Duration::minutes(5);

/// How long a lockout lasts once triggered.
pub const BLOCK_DURATION: Duration = Duration::minutes(15);

/// Attempts older than this are pruned from the persisted history.
pub const RETENTION: Duration = Duration::hours(24);

/// Failure notices mention the remaining count once this many or fewer remain.
pub const WARN_AT_REMAINING: u32 = 3;

/// Key under which the attempt history is persisted.
pub const STORAGE_KEY: &str = "login_attempts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Default: 5
    pub max_attempts: u32,

    /// Default: 5 minutes
    pub attempt_window: Duration,

    /// Default: 15 minutes
    pub block_duration: Duration,

    /// Default: 24 hours
    pub retention: Duration,

    /// Default: 3
    pub warn_at_remaining: u32,

    /// Default: `login_attempts`
    pub storage_key: String,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            attempt_window: ATTEMPT_WINDOW,
            block_duration: BLOCK_DURATION,
            retention: RETENTION,
            warn_at_remaining: WARN_AT_REMAINING,
            storage_key: STORAGE_KEY.to_owned(),
        }
    }
}

impl ThrottleConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1");
        }
        if self.attempt_window <= Duration::zero() {
            return Err("attempt_window must be positive");
        }
        if self.block_duration <= Duration::zero() {
            return Err("block_duration must be positive");
        }
        if self.retention < self.attempt_window {
            return Err("retention must not be shorter than attempt_window");
        }
        if self.storage_key.is_empty() {
            return Err("storage_key must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ThrottleConfig::default();

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.attempt_window, Duration::minutes(5));
        assert_eq!(config.block_duration, Duration::minutes(15));
        assert_eq!(config.retention, Duration::hours(24));
        assert_eq!(config.warn_at_remaining, 3);
        assert_eq!(config.storage_key, "login_attempts");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config = ThrottleConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_retention_shorter_than_window() {
        let config = ThrottleConfig {
            retention: Duration::minutes(1),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err("retention must not be shorter than attempt_window")
        );
    }

    #[test]
    fn test_validate_empty_key() {
        let config = ThrottleConfig {
            storage_key: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
