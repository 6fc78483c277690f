use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tokio::time::MissedTickBehavior;

use super::attempt::{LoginAttempt, retain_within};
use super::history::AttemptHistory;
use super::message::{format_countdown, lockout_message, remaining_attempts_warning};
use super::state::{Evaluation, LockState, evaluate};
use super::store::KeyValueStore;
use crate::events::{ThrottleEvent, dispatch};
use crate::{Authenticator, Clock, Credentials, SystemClock, ThrottleConfig};

/// Result of a login submission.
///
/// Throttling decisions are values, never errors. Only the authenticator's
/// own error is carried through, unmodified, in [`LoginOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome<S, E> {
    /// The authenticator accepted the credentials; history was cleared.
    Authenticated(S),
    /// The authenticator rejected the credentials. `state` is the lock
    /// state after recording the failure, `Blocked` if it tripped the limit.
    Failed { error: E, state: LockState },
    /// Rejected locally; the authenticator was not called.
    Blocked {
        until: DateTime<Utc>,
        retry_after: Duration,
    },
    /// Another submission on this limiter is still awaiting the authenticator.
    InProgress,
}

impl<S, E> LoginOutcome<S, E> {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// True when login is locked after this outcome, whether the submission
    /// was rejected locally or its failure tripped the limit.
    pub fn is_locked(&self) -> bool {
        match self {
            Self::Blocked { .. } => true,
            Self::Failed { state, .. } => state.is_blocked(),
            Self::Authenticated(_) | Self::InProgress => false,
        }
    }

    /// The message to show the user, if any.
    pub fn notice(&self, now: DateTime<Utc>, config: &ThrottleConfig) -> Option<String> {
        match self {
            Self::Blocked { until, .. }
            | Self::Failed {
                state: LockState::Blocked { until },
                ..
            } => Some(lockout_message(*until - now)),
            Self::Failed {
                state: LockState::Unblocked { remaining },
                ..
            } if *remaining <= config.warn_at_remaining => {
                Some(remaining_attempts_warning(*remaining))
            }
            Self::Failed { .. } | Self::Authenticated(_) | Self::InProgress => None,
        }
    }
}

/// Throttles login submissions using a persisted attempt history.
///
/// State is never cached: every check re-reads the history and evaluates it
/// at the clock's current time.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use login_throttle::{InMemoryStore, LoginRateLimiter};
///
/// let limiter = LoginRateLimiter::new(Arc::new(InMemoryStore::new()));
/// assert_eq!(limiter.config().max_attempts, 5);
/// ```
pub struct LoginRateLimiter {
    history: AttemptHistory,
    clock: Arc<dyn Clock>,
    config: ThrottleConfig,
    submitting: AtomicBool,
}

impl LoginRateLimiter {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, Arc::new(SystemClock), ThrottleConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: ThrottleConfig,
    ) -> Self {
        let history = AttemptHistory::new(store, config.storage_key.clone(), Arc::clone(&clock));
        Self {
            history,
            clock,
            config,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    pub fn history(&self) -> &AttemptHistory {
        &self.history
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// True while a [`submit`](Self::submit) is awaiting the authenticator;
    /// the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Evaluates the stored history now.
    ///
    /// When a lockout has run out, the history is pruned to the attempt
    /// window and persisted, so the user starts over with every attempt
    /// available.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "throttle_status", skip_all)
    )]
    pub async fn status(&self) -> Evaluation {
        let now = self.clock.now();
        let mut attempts = self.history.load().await;
        let evaluation = evaluate(&attempts, now, &self.config);

        if !evaluation.lockout_expired {
            return evaluation;
        }

        retain_within(&mut attempts, self.config.attempt_window, now);
        self.history.save(&attempts).await;

        log::info!(target: "login_throttle", "msg=\"lockout expired, attempt history pruned\", kept={}", attempts.len());
        dispatch(ThrottleEvent::LockoutExpired { at: now }).await;

        evaluate(&attempts, now, &self.config)
    }

    /// Appends an attempt at the current time, prunes attempts past the
    /// retention period, persists, and returns the new evaluation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "throttle_record_attempt", skip(self))
    )]
    pub async fn record_attempt(&self, success: bool) -> Evaluation {
        // persisted with millisecond precision
        let now = self.clock.now().trunc_subsecs(3);
        let mut attempts = self.history.load().await;
        let was_blocked = evaluate(&attempts, now, &self.config).is_blocked();

        attempts.push(LoginAttempt::new(now, success));
        retain_within(&mut attempts, self.config.retention, now);
        self.history.save(&attempts).await;

        let evaluation = evaluate(&attempts, now, &self.config);

        dispatch(ThrottleEvent::AttemptRecorded {
            success,
            remaining: evaluation.remaining(),
            at: now,
        })
        .await;

        if let LockState::Blocked { until } = evaluation.state {
            if !was_blocked {
                log::warn!(target: "login_throttle", "msg=\"login locked\", failures={}, until=\"{until}\"", evaluation.recent_failures);
                dispatch(ThrottleEvent::LockoutStarted {
                    failures: evaluation.recent_failures,
                    until,
                    at: now,
                })
                .await;
            }
        }

        evaluation
    }

    /// Wipes the attempt history after a verified sign-in.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "throttle_clear", skip_all)
    )]
    pub async fn clear_on_success(&self) {
        self.history.clear().await;
        log::debug!(target: "login_throttle", "msg=\"attempt history cleared\"");
        dispatch(ThrottleEvent::HistoryCleared {
            at: self.clock.now(),
        })
        .await;
    }

    /// Runs one login submission through the limiter.
    ///
    /// While blocked the authenticator is not called. Otherwise its outcome
    /// is recorded: success clears the history, failure counts toward the
    /// limit.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login_submit", skip_all)
    )]
    pub async fn submit<A: Authenticator>(
        &self,
        authenticator: &A,
        credentials: &Credentials,
    ) -> LoginOutcome<A::Session, A::Error> {
        let Some(_guard) = SubmitGuard::acquire(&self.submitting) else {
            return LoginOutcome::InProgress;
        };

        if let LockState::Blocked { until } = self.status().await.state {
            let now = self.clock.now();
            log::info!(target: "login_throttle", "msg=\"submission rejected while locked\", until=\"{until}\"");
            dispatch(ThrottleEvent::SubmissionBlocked { until, at: now }).await;
            return LoginOutcome::Blocked {
                until,
                retry_after: (until - now).max(Duration::zero()),
            };
        }

        match authenticator.authenticate(credentials).await {
            Ok(session) => {
                self.record_attempt(true).await;
                self.clear_on_success().await;
                LoginOutcome::Authenticated(session)
            }
            Err(error) => {
                let evaluation = self.record_attempt(false).await;
                LoginOutcome::Failed {
                    error,
                    state: evaluation.state,
                }
            }
        }
    }

    /// Re-evaluates once a second, passing each state and the time left as
    /// `MM:SS` to `on_tick`, and returns the first unblocked state.
    ///
    /// Drives the lockout countdown display; the final tick observes the
    /// lockout ending and shows `00:00`.
    pub async fn countdown<F>(&self, mut on_tick: F) -> LockState
    where
        F: FnMut(&LockState, &str),
    {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let state = self.status().await.state;
            let left = state
                .retry_after(self.clock.now())
                .unwrap_or_else(Duration::zero);
            on_tick(&state, &format_countdown(left));
            if !state.is_blocked() {
                return state;
            }
        }
    }
}

impl std::fmt::Debug for LoginRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRateLimiter")
            .field("config", &self.config)
            .field("history", &self.history)
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

/// Marks a submission in flight; released on drop, including when the
/// submit future is dropped mid-await.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
