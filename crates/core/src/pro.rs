//! Pro subscription rules.
//!
//! Pro is the paid tier; its only marketplace effect is early access to new
//! campaigns. Payment happens outside this system, so subscriptions are
//! granted and cancelled by admins.

use chrono::{Duration, Months};

use crate::types::Timestamp;

pub const PRO_ACTIVE: &str = "active";
pub const PRO_EXPIRED: &str = "expired";
pub const PRO_CANCELLED: &str = "cancelled";

/// Longest single grant an admin can issue.
pub const MAX_GRANT_MONTHS: u32 = 24;

/// Whether an active subscription row still covers `now`.
pub fn is_current(status: &str, ends_at: Timestamp, now: Timestamp) -> bool {
    status == PRO_ACTIVE && now < ends_at
}

/// Compute the period of a new grant.
///
/// A grant made while an existing subscription is current extends it from
/// its end; otherwise the new period starts now.
pub fn grant_period(
    months: u32,
    current_ends_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<(Timestamp, Timestamp), String> {
    if months == 0 || months > MAX_GRANT_MONTHS {
        return Err(format!("months must be between 1 and {MAX_GRANT_MONTHS}"));
    }
    let starts_at = match current_ends_at {
        Some(end) if end > now => end,
        _ => now,
    };
    let ends_at = starts_at
        .checked_add_months(Months::new(months))
        .unwrap_or_else(|| starts_at + Duration::days(30 * i64::from(months)));
    Ok((starts_at, ends_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn current_requires_active_and_unexpired() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let later = now + Duration::days(1);
        assert!(is_current(PRO_ACTIVE, later, now));
        assert!(!is_current(PRO_ACTIVE, now, now));
        assert!(!is_current(PRO_CANCELLED, later, now));
    }

    #[test]
    fn grant_starts_now_without_current_subscription() {
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 10, 0, 0).unwrap();
        let (start, end) = grant_period(1, None, now).unwrap();
        assert_eq!(start, now);
        // Month arithmetic clamps to the end of February.
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 2, 28, 10, 0, 0).unwrap());
    }

    #[test]
    fn grant_extends_current_subscription() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let current_end = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        let (start, end) = grant_period(3, Some(current_end), now).unwrap();
        assert_eq!(start, current_end);
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn grant_rejects_out_of_range_months() {
        let now = Utc::now();
        assert!(grant_period(0, None, now).is_err());
        assert!(grant_period(MAX_GRANT_MONTHS + 1, None, now).is_err());
    }
}
