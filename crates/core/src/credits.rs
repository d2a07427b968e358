//! Weekly application credits.
//!
//! Every influencer gets [`WEEKLY_CREDITS`] credits per week. Each campaign
//! application costs [`APPLICATION_CREDIT_COST`]. The balance is refilled
//! lazily: whenever it is read, a stored reset time in the past means the
//! week rolled over and the balance starts fresh. Weeks roll over at Monday
//! 00:00 India Standard Time.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::types::Timestamp;

/// Credits granted at the start of every week.
pub const WEEKLY_CREDITS: i32 = 5;

/// Credits charged per campaign application.
pub const APPLICATION_CREDIT_COST: i32 = 1;

/// IST is UTC+05:30 with no daylight saving.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within bounds")
}

/// The next Monday 00:00 IST strictly after `now`, expressed in UTC.
pub fn next_weekly_reset(now: Timestamp) -> Timestamp {
    let local: DateTime<FixedOffset> = now.with_timezone(&ist());
    let days_ahead = 7 - i64::from(local.weekday().num_days_from_monday());
    let monday = local.date_naive() + Duration::days(days_ahead);
    let midnight = monday.and_time(NaiveTime::MIN);

    ist()
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now + Duration::days(days_ahead))
}

/// Credit balance after applying any pending weekly reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditBalance {
    pub credits: i32,
    pub resets_at: Timestamp,
    /// True when this read rolled the week over and the row must be saved.
    #[serde(skip)]
    pub was_reset: bool,
}

/// Resolve the effective balance from the stored counter and reset time.
pub fn effective_balance(
    stored_credits: i32,
    stored_reset_at: Option<Timestamp>,
    now: Timestamp,
) -> CreditBalance {
    match stored_reset_at {
        Some(resets_at) if now < resets_at => CreditBalance {
            credits: stored_credits,
            resets_at,
            was_reset: false,
        },
        _ => CreditBalance {
            credits: WEEKLY_CREDITS,
            resets_at: next_weekly_reset(now),
            was_reset: true,
        },
    }
}

/// Check that an application can be paid for.
pub fn ensure_can_apply(balance: &CreditBalance) -> Result<(), String> {
    if balance.credits < APPLICATION_CREDIT_COST {
        return Err(format!(
            "No credits left this week. Credits reset at {}",
            balance.resets_at.to_rfc3339()
        ));
    }
    Ok(())
}
