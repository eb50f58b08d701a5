//! Reminder pipeline for approved upcoming leaves.
//!
//! Source of truth is the leave-request store, not monitoring records.
//! A reminder tier (7, 3 or 1 days before the start date) is sent at
//! most once per leave request: the dedup row is written only after a
//! successful dispatch, so a transport failure is retried on the next
//! scheduled run instead of inline.

use crate::config::Config;
use crate::db::{leave_requests, log, reminders};
use crate::errors::AppResult;
use crate::gateway::{NotificationGateway, WorkerDirectory};
use crate::models::leave_request::LeaveRequest;
use crate::models::monitoring::MonitoringRecord;
use crate::models::reminder::{ReminderHistoryEntry, ReminderRun};
use crate::ui::messages::warning;
use chrono::NaiveDate;
use rusqlite::Connection;

/// One reminder that `send_due_reminders` would dispatch today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReminder {
    pub leave_request_id: i64,
    pub worker_id: String,
    pub tier: i64,
    pub start_date: NaiveDate,
}

/// Evaluate without dispatching: the reminders due today that have no
/// dedup record yet. Writes nothing, not even the operation log, so a
/// dry run never masquerades as a real run.
pub fn plan_due_reminders(
    conn: &Connection,
    cfg: &Config,
    today: NaiveDate,
) -> AppResult<Vec<PlannedReminder>> {
    let mut planned = Vec::new();

    for leave in leave_requests::list_approved_upcoming(conn, today)? {
        let days_until_start = (leave.start_date - today).num_days();

        if !cfg.reminder_offsets.contains(&days_until_start) {
            continue;
        }
        if reminders::dedup_exists(conn, leave.id, days_until_start)? {
            continue;
        }

        planned.push(PlannedReminder {
            leave_request_id: leave.id,
            worker_id: leave.worker_id.clone(),
            tier: days_until_start,
            start_date: leave.start_date,
        });
    }

    Ok(planned)
}

pub fn send_due_reminders(
    conn: &Connection,
    cfg: &Config,
    directory: &dyn WorkerDirectory,
    gateway: &dyn NotificationGateway,
    today: NaiveDate,
) -> AppResult<ReminderRun> {
    let mut run = ReminderRun::default();

    for leave in leave_requests::list_approved_upcoming(conn, today)? {
        let days_until_start = (leave.start_date - today).num_days();

        // Only an exact tier match is due today; the dedup record keeps
        // repeated runs on the same day from doubling up.
        if !cfg.reminder_offsets.contains(&days_until_start) {
            continue;
        }

        if reminders::dedup_exists(conn, leave.id, days_until_start)? {
            continue;
        }

        match dispatch_one(conn, directory, gateway, &leave, days_until_start) {
            Ok(true) => run.sent += 1,
            Ok(false) => run.failed += 1,
            Err(e) => {
                // Per-worker failures are logged and never abort the run.
                warning(format!(
                    "reminder for leave request {} (worker {}) failed: {}",
                    leave.id, leave.worker_id, e
                ));
                run.failed += 1;
            }
        }
    }

    log::log_operation(
        conn,
        "remind",
        &today.format("%Y-%m-%d").to_string(),
        &format!("{} sent, {} failed", run.sent, run.failed),
    )?;

    Ok(run)
}

/// Send one reminder. Returns Ok(true) on a successful dispatch (dedup
/// and history persisted), Ok(false) when the worker cannot be reached
/// through the directory (no contact, no phone).
fn dispatch_one(
    conn: &Connection,
    directory: &dyn WorkerDirectory,
    gateway: &dyn NotificationGateway,
    leave: &LeaveRequest,
    tier: i64,
) -> AppResult<bool> {
    let Some(contact) = directory.worker(&leave.worker_id)? else {
        warning(format!(
            "worker {} not found in directory; reminder skipped",
            leave.worker_id
        ));
        return Ok(false);
    };

    let Some(phone) = contact.phone.as_deref().filter(|p| !p.is_empty()) else {
        warning(format!(
            "worker {} has no phone number; reminder skipped",
            leave.worker_id
        ));
        return Ok(false);
    };

    let message = render_message(&contact.name, leave.start_date, tier);

    gateway.send(phone, &message)?;

    // Only now is the tier marked handled; a failed send above leaves
    // no trace so the next run retries.
    let sent_at = MonitoringRecord::now_iso();
    reminders::insert_dedup(conn, leave.id, tier, &sent_at)?;
    reminders::append_history(
        conn,
        &ReminderHistoryEntry {
            id: 0,
            leave_request_id: leave.id,
            worker_id: leave.worker_id.clone(),
            tier,
            sent_at,
            destination: phone.to_string(),
            message,
        },
    )?;

    Ok(true)
}

fn render_message(name: &str, start: NaiveDate, days: i64) -> String {
    let when = if days == 1 {
        "tomorrow".to_string()
    } else {
        format!("in {} days", days)
    };
    format!(
        "Reminder: {}, your approved leave starts {} on {}.",
        name,
        when,
        start.format("%Y-%m-%d")
    )
}
