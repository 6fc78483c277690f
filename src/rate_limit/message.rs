//! User-facing notices.
//!
//! Failure notices never say whether the identifier or the password was
//! wrong; they only report how many attempts are left.

use chrono::Duration;

pub fn lockout_message(retry_after: Duration) -> String {
    let secs = retry_after.num_seconds().max(0)
        + i64::from(retry_after.subsec_nanos() > 0);

    if secs < 60 {
        let secs = secs.max(1);
        format!(
            "Too many failed login attempts. Please try again in {secs} second{}.",
            plural(secs)
        )
    } else {
        let minutes = (secs + 59) / 60;
        format!(
            "Too many failed login attempts. Please try again in {minutes} minute{}.",
            plural(minutes)
        )
    }
}

pub fn remaining_attempts_warning(remaining: u32) -> String {
    format!(
        "Invalid login credentials. {remaining} attempt{} remaining before login is temporarily locked.",
        plural(i64::from(remaining))
    )
}

/// `MM:SS` for the lockout countdown, clamped at `00:00`.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0)
        + i64::from(remaining > Duration::zero() && remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockout_message_minutes_round_up() {
        assert_eq!(
            lockout_message(Duration::minutes(15)),
            "Too many failed login attempts. Please try again in 15 minutes."
        );
        assert_eq!(
            lockout_message(Duration::minutes(14) + Duration::seconds(1)),
            "Too many failed login attempts. Please try again in 15 minutes."
        );
        assert_eq!(
            lockout_message(Duration::seconds(61)),
            "Too many failed login attempts. Please try again in 2 minutes."
        );
        assert_eq!(
            lockout_message(Duration::seconds(60)),
            "Too many failed login attempts. Please try again in 1 minute."
        );
    }

    #[test]
    fn test_lockout_message_seconds() {
        assert_eq!(
            lockout_message(Duration::seconds(42)),
            "Too many failed login attempts. Please try again in 42 seconds."
        );
        assert_eq!(
            lockout_message(Duration::milliseconds(200)),
            "Too many failed login attempts. Please try again in 1 second."
        );
    }

    #[test]
    fn test_remaining_attempts_warning() {
        assert_eq!(
            remaining_attempts_warning(3),
            "Invalid login credentials. 3 attempts remaining before login is temporarily locked."
        );
        assert_eq!(
            remaining_attempts_warning(1),
            "Invalid login credentials. 1 attempt remaining before login is temporarily locked."
        );
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::minutes(15)), "15:00");
        assert_eq!(format_countdown(Duration::seconds(65)), "01:05");
        assert_eq!(format_countdown(Duration::milliseconds(64_500)), "01:05");
        assert_eq!(format_countdown(Duration::seconds(-3)), "00:00");
    }
}
