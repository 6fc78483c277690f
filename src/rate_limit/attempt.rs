use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One login submission that reached the authenticator.
///
/// Serialized as `{"timestamp": <epoch millis>, "success": bool}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

impl LoginAttempt {
    pub fn new(timestamp: DateTime<Utc>, success: bool) -> Self {
        Self { timestamp, success }
    }

    pub fn failed(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, false)
    }

    pub fn succeeded(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, true)
    }

    /// True while `now - timestamp < span`.
    pub fn is_within(&self, span: Duration, now: DateTime<Utc>) -> bool {
        now - self.timestamp < span
    }
}

/// Drops every attempt at least `span` old.
pub(crate) fn retain_within(attempts: &mut Vec<LoginAttempt>, span: Duration, now: DateTime<Utc>) {
    attempts.retain(|attempt| attempt.is_within(span, now));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_epoch_millis() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let json = serde_json::to_string(&LoginAttempt::failed(at)).unwrap();
        assert_eq!(json, r#"{"timestamp":1700000000123,"success":false}"#);

        let parsed: Vec<LoginAttempt> =
            serde_json::from_str(r#"[{"timestamp":1700000000123,"success":true}]"#).unwrap();
        assert_eq!(parsed, vec![LoginAttempt::succeeded(at)]);
    }

    #[test]
    fn test_retain_within_drops_boundary() {
        let now = Utc::now();
        let mut attempts = vec![
            LoginAttempt::failed(now - Duration::hours(25)),
            LoginAttempt::failed(now - Duration::hours(24)),
            LoginAttempt::failed(now - Duration::hours(23)),
            LoginAttempt::succeeded(now),
        ];

        retain_within(&mut attempts, Duration::hours(24), now);

        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].timestamp, now - Duration::hours(23));
    }
}
