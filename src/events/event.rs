use chrono::{DateTime, Utc};

/// Events emitted by the login rate limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleEvent {
    // history
    AttemptRecorded {
        success: bool,
        remaining: u32,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        at: DateTime<Utc>,
    },

    // lock state
    LockoutStarted {
        failures: u32,
        until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    LockoutExpired {
        at: DateTime<Utc>,
    },
    SubmissionBlocked {
        until: DateTime<Utc>,
        at: DateTime<Utc>,
    },

    // storage
    StorageDegraded {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl ThrottleEvent {
    /// Dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AttemptRecorded { success: true, .. } => "throttle.attempt.succeeded",
            Self::AttemptRecorded { success: false, .. } => "throttle.attempt.failed",
            Self::HistoryCleared { .. } => "throttle.history.cleared",
            Self::LockoutStarted { .. } => "throttle.lockout.started",
            Self::LockoutExpired { .. } => "throttle.lockout.expired",
            Self::SubmissionBlocked { .. } => "throttle.submission.blocked",
            Self::StorageDegraded { .. } => "throttle.storage.degraded",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AttemptRecorded { at, .. }
            | Self::HistoryCleared { at }
            | Self::LockoutStarted { at, .. }
            | Self::LockoutExpired { at }
            | Self::SubmissionBlocked { at, .. }
            | Self::StorageDegraded { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();

        assert_eq!(
            ThrottleEvent::AttemptRecorded {
                success: false,
                remaining: 4,
                at: now,
            }
            .name(),
            "throttle.attempt.failed"
        );
        assert_eq!(
            ThrottleEvent::AttemptRecorded {
                success: true,
                remaining: 5,
                at: now,
            }
            .name(),
            "throttle.attempt.succeeded"
        );
        assert_eq!(
            ThrottleEvent::LockoutStarted {
                failures: 5,
                until: now,
                at: now,
            }
            .name(),
            "throttle.lockout.started"
        );
        assert_eq!(
            ThrottleEvent::StorageDegraded {
                reason: "disabled".to_owned(),
                at: now,
            }
            .name(),
            "throttle.storage.degraded"
        );
    }

    #[test]
    fn test_event_timestamp() {
        let now = Utc::now();
        let event = ThrottleEvent::SubmissionBlocked {
            until: now + chrono::Duration::minutes(15),
            at: now,
        };

        assert_eq!(event.timestamp(), now);
    }
}
