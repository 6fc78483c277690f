use chrono::{DateTime, Duration, Utc};

use super::attempt::LoginAttempt;
use crate::ThrottleConfig;

/// Whether the next submission may reach the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Submissions allowed; `remaining` failures left before lockout.
    Unblocked { remaining: u32 },
    /// Submissions rejected locally until `until`.
    Blocked { until: DateTime<Utc> },
}

impl LockState {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn blocked_until(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Blocked { until } => Some(*until),
            Self::Unblocked { .. } => None,
        }
    }

    /// Zero while blocked.
    pub fn remaining(&self) -> u32 {
        match self {
            Self::Unblocked { remaining } => *remaining,
            Self::Blocked { .. } => 0,
        }
    }

    /// Time left on the lockout, never negative.
    pub fn retry_after(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.blocked_until()
            .map(|until| (until - now).max(Duration::zero()))
    }
}

/// Result of evaluating an attempt history at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub state: LockState,
    /// Failures inside the attempt window ending at "now".
    pub recent_failures: u32,
    /// A lockout was triggered in this history and has run out. The caller
    /// is expected to prune the history to the attempt window.
    pub lockout_expired: bool,
}

impl Evaluation {
    pub fn is_blocked(&self) -> bool {
        self.state.is_blocked()
    }

    pub fn blocked_until(&self) -> Option<DateTime<Utc>> {
        self.state.blocked_until()
    }

    pub fn remaining(&self) -> u32 {
        self.state.remaining()
    }
}

/// Derives the lock state from an attempt history.
///
/// Only failures after the latest success count. A failure triggers a
/// lockout when it completes `max_attempts` failures inside one attempt
/// window; the lockout runs `block_duration` from the most recent such
/// failure. Attempts dated more than `block_duration` after `now` are
/// ignored. Pure: the history is not modified.
pub fn evaluate(
    attempts: &[LoginAttempt],
    now: DateTime<Utc>,
    config: &ThrottleConfig,
) -> Evaluation {
    let horizon = now
        .checked_add_signed(config.block_duration)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let plausible = |attempt: &&LoginAttempt| attempt.timestamp <= horizon;

    let last_success = attempts
        .iter()
        .filter(plausible)
        .filter(|attempt| attempt.success)
        .map(|attempt| attempt.timestamp)
        .max();

    let mut failures: Vec<DateTime<Utc>> = attempts
        .iter()
        .filter(plausible)
        .filter(|attempt| !attempt.success && attempt.is_within(config.retention, now))
        .filter(|attempt| last_success.map_or(true, |success| attempt.timestamp > success))
        .map(|attempt| attempt.timestamp)
        .collect();
    failures.sort_unstable();

    let threshold = usize::try_from(config.max_attempts).unwrap_or(usize::MAX);
    let mut blocked_until = None;
    let mut start = 0;
    for (end, &at) in failures.iter().enumerate() {
        while start < end && at - failures[start] >= config.attempt_window {
            start += 1;
        }
        if end + 1 - start >= threshold {
            if let Some(until) = at.checked_add_signed(config.block_duration) {
                blocked_until = Some(until);
            }
        }
    }

    let recent = failures
        .iter()
        .filter(|&&at| now - at < config.attempt_window)
        .count();
    let recent_failures = u32::try_from(recent).unwrap_or(u32::MAX);

    match blocked_until {
        Some(until) if now < until => Evaluation {
            state: LockState::Blocked { until },
            recent_failures,
            lockout_expired: false,
        },
        expired => Evaluation {
            state: LockState::Unblocked {
                remaining: config.max_attempts.saturating_sub(recent_failures),
            },
            recent_failures,
            lockout_expired: expired.is_some(),
        },
    }
}
