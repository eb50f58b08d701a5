//! Periodic recomputation of derived monitoring fields.
//!
//! Re-derives `(days_remaining, status, next_eligible)` for every record
//! from the current date and persists only actual changes, so running it
//! twice with no elapsed time writes nothing. Records pinned `OnLeave`
//! are skipped until their approved leave has ended; then the countdown
//! restarts from the leave's end date.

use crate::config::Config;
use crate::core::status;
use crate::db::{leave_requests, log, monitoring};
use crate::errors::AppResult;
use crate::models::monitoring::{LeaveStatus, MonitoringRecord};
use crate::ui::messages::warning;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

/// A version-guarded write is retried this many times against freshly
/// read state before the record is left for the next run.
const MAX_WRITE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RecomputeStats {
    pub examined: u32,
    pub updated: u32,
    pub completed_leaves: u32,
    pub conflicts: u32,
    pub skipped: u32,
}

pub fn recompute_all(
    conn: &Connection,
    cfg: &Config,
    today: NaiveDate,
) -> AppResult<RecomputeStats> {
    let mut stats = RecomputeStats::default();

    let records = monitoring::list(conn, None, None)?;

    for rec in records {
        stats.examined += 1;

        // One bad record must not halt the batch.
        let outcome = if rec.status == LeaveStatus::OnLeave {
            complete_leave_if_ended(conn, cfg, today, &rec)
        } else {
            refresh_record(conn, cfg, today, &rec)
        };

        match outcome {
            Ok(o) => o.tally(&mut stats),
            Err(e) => {
                warning(format!(
                    "recompute skipped record {} (worker {}): {}",
                    rec.id, rec.worker_id, e
                ));
                stats.skipped += 1;
            }
        }
    }

    log::log_operation(
        conn,
        "recompute",
        &today.format("%Y-%m-%d").to_string(),
        &format!(
            "{} examined, {} updated, {} leaves completed, {} conflicts",
            stats.examined, stats.updated, stats.completed_leaves, stats.conflicts
        ),
    )?;

    Ok(stats)
}

enum Outcome {
    Unchanged,
    Updated,
    CompletedLeave,
    Conflict,
}

impl Outcome {
    fn tally(self, stats: &mut RecomputeStats) {
        match self {
            Outcome::Unchanged => {}
            Outcome::Updated => stats.updated += 1,
            Outcome::CompletedLeave => stats.completed_leaves += 1,
            Outcome::Conflict => stats.conflicts += 1,
        }
    }
}

/// Re-derive and persist one record, retrying against fresh state when a
/// concurrent approval moved it first. A recompute must never revert a
/// `Due -> OnLeave` transition it raced with.
fn refresh_record(
    conn: &Connection,
    cfg: &Config,
    today: NaiveDate,
    rec: &MonitoringRecord,
) -> AppResult<Outcome> {
    let mut current = rec.clone();

    for _ in 0..MAX_WRITE_ATTEMPTS {
        if current.status == LeaveStatus::OnLeave {
            // An approval won the race; leave the pin alone.
            return Ok(Outcome::Unchanged);
        }

        let (days_remaining, new_status) =
            status::evaluate(current.anchor_date, today, cfg.due_window_days);
        let next_eligible = status::next_eligible(current.anchor_date, current.tier);

        if days_remaining == current.days_remaining
            && new_status == current.status
            && next_eligible == current.next_eligible
        {
            return Ok(Outcome::Unchanged);
        }

        let written = monitoring::update_derived(
            conn,
            current.id,
            days_remaining,
            new_status,
            next_eligible,
            current.version,
        )?;

        if written {
            return Ok(Outcome::Updated);
        }

        // Version guard missed: somebody wrote in between. Re-read and
        // re-derive rather than clobbering their state.
        match monitoring::get(conn, current.id)? {
            Some(fresh) => current = fresh,
            None => return Ok(Outcome::Unchanged), // deleted meanwhile
        }
    }

    Ok(Outcome::Conflict)
}

/// Release an `OnLeave` pin once the approved leave has ended: the
/// countdown restarts with the end date as the base of the new window.
fn complete_leave_if_ended(
    conn: &Connection,
    cfg: &Config,
    today: NaiveDate,
    rec: &MonitoringRecord,
) -> AppResult<Outcome> {
    let Some(leave) = leave_requests::latest_approved_for_worker(conn, &rec.worker_id)? else {
        // Pinned without a matching leave request; leave it for the
        // operator rather than guessing.
        return Ok(Outcome::Unchanged);
    };

    if leave.end_date >= today {
        return Ok(Outcome::Unchanged); // still on leave
    }

    let fresh_anchor = leave.end_date + Duration::days(rec.tier.days());
    let (days_remaining, new_status) =
        status::evaluate(Some(fresh_anchor), today, cfg.due_window_days);
    let next_eligible = status::next_eligible(Some(fresh_anchor), rec.tier);

    let written = monitoring::reset_anchor(
        conn,
        rec.id,
        fresh_anchor,
        days_remaining,
        new_status,
        next_eligible,
        rec.version,
    )?;

    if written {
        Ok(Outcome::CompletedLeave)
    } else {
        Ok(Outcome::Conflict)
    }
}
