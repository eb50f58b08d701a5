//! Pure status derivation for monitoring records.
//!
//! `status` and `days_remaining` are always a function of the anchor date
//! and the evaluation date; nothing else may set them, except the approval
//! path which pins `OnLeave` for the duration of an active leave.

use crate::models::monitoring::{EntitlementTier, LeaveStatus};
use chrono::{Duration, NaiveDate};

/// Days before the anchor date at which a record enters the approval queue.
pub const DEFAULT_DUE_WINDOW_DAYS: i64 = 10;

/// Evaluate a record's derived fields for a given "today".
///
/// Positive `days_remaining` means the anchor date is in the future.
/// Records without an anchor cannot run a countdown and stay `Unscheduled`.
pub fn evaluate(
    anchor: Option<NaiveDate>,
    today: NaiveDate,
    due_window_days: i64,
) -> (Option<i64>, LeaveStatus) {
    let Some(anchor) = anchor else {
        return (None, LeaveStatus::Unscheduled);
    };

    let days_remaining = (anchor - today).num_days();

    let status = if days_remaining > due_window_days {
        LeaveStatus::Active
    } else if days_remaining >= 0 {
        LeaveStatus::Due
    } else {
        LeaveStatus::Overdue
    };

    (Some(days_remaining), status)
}

/// Next eligible leave date: anchor plus the tier's day count.
pub fn next_eligible(anchor: Option<NaiveDate>, tier: EntitlementTier) -> Option<NaiveDate> {
    anchor.and_then(|d| d.checked_add_signed(Duration::days(tier.days())))
}
