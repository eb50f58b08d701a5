//! Approval bridge: turns a `Due` monitoring record into an approved
//! leave request, or returns it to active tracking.
//!
//! `Due` is the only state this module will act on. Anything else yields
//! an idempotent no-op result instead of an error, because the known UI
//! pattern is double-submission: the second click must succeed silently
//! without creating a second leave request.

use crate::config::Config;
use crate::db::{leave_requests, log, monitoring};
use crate::errors::{AppError, AppResult};
use crate::models::monitoring::{LeaveStatus, MonitoringRecord};
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

const MAX_CLAIM_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Optional caller-supplied leave parameters. Anything absent is
/// computed from the record and the configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub leave_type: Option<String>,
    pub attachment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// Approval went through; exactly one leave request was created.
    Approved { leave_request_id: i64 },
    /// Rejection went through; the record is back in active tracking.
    Rejected,
    /// The record was not in `Due` (already resolved, or not yet due).
    /// Nothing was changed; callers may retry without harm.
    NotDue { status: String },
}

pub fn resolve(
    conn: &mut Connection,
    cfg: &Config,
    today: NaiveDate,
    monitoring_id: i64,
    decision: Decision,
    overrides: &Overrides,
) -> AppResult<Resolution> {
    let mut record = monitoring::get(conn, monitoring_id)?
        .ok_or_else(|| AppError::NotFound(format!("monitoring id {}", monitoring_id)))?;

    for _ in 0..MAX_CLAIM_ATTEMPTS {
        if record.status != LeaveStatus::Due {
            return Ok(Resolution::NotDue {
                status: record.status.to_db_str().to_string(),
            });
        }

        let outcome = match decision {
            Decision::Approve => approve(conn, cfg, today, &record, overrides)?,
            Decision::Reject => reject(conn, &record)?,
        };

        if let Some(resolution) = outcome {
            log::log_operation(
                conn,
                "resolve",
                &record.worker_id,
                &format!("monitoring {} -> {:?}", monitoring_id, resolution),
            )?;
            return Ok(resolution);
        }

        // Claim missed: a recompute bumped the version, or another caller
        // resolved the record first. Re-read and decide again.
        record = monitoring::get(conn, monitoring_id)?
            .ok_or_else(|| AppError::NotFound(format!("monitoring id {}", monitoring_id)))?;
    }

    Err(AppError::Conflict(format!(
        "could not claim monitoring record {} after {} attempts",
        monitoring_id, MAX_CLAIM_ATTEMPTS
    )))
}

/// Claim the record (`Due -> OnLeave`) and emit the approved leave
/// request in one transaction: either both happen or neither does.
fn approve(
    conn: &mut Connection,
    cfg: &Config,
    today: NaiveDate,
    record: &MonitoringRecord,
    overrides: &Overrides,
) -> AppResult<Option<Resolution>> {
    let (start, end) = leave_window(cfg, record, overrides)?;

    if end < start {
        return Err(AppError::Validation(format!(
            "leave end date {} precedes start date {}",
            end, start
        )));
    }
    // A Due record's window may already have opened; starting in the
    // past is still rejected for an explicit override.
    if let Some(s) = overrides.start_date
        && s < today
    {
        return Err(AppError::Validation(format!(
            "leave start date {} is in the past",
            s
        )));
    }

    let leave_type = overrides.leave_type.as_deref().unwrap_or("annual");

    let tx = conn.transaction()?;

    let claimed = monitoring::transition_status(
        &tx,
        record.id,
        LeaveStatus::Due,
        LeaveStatus::OnLeave,
        record.version,
    )?;

    if !claimed {
        // Lost the race; nothing to roll back, the transaction is empty.
        return Ok(None);
    }

    let leave_request_id = leave_requests::create(
        &tx,
        &record.worker_id,
        start,
        end,
        leave_type,
        overrides.attachment.as_deref(),
        "approved",
        &MonitoringRecord::now_iso(),
    )?;

    tx.commit()?;

    Ok(Some(Resolution::Approved { leave_request_id }))
}

fn reject(conn: &Connection, record: &MonitoringRecord) -> AppResult<Option<Resolution>> {
    // Back to active tracking; the anchor stays untouched, so the next
    // recompute may lawfully re-derive Due from it.
    let reverted = monitoring::transition_status(
        conn,
        record.id,
        LeaveStatus::Due,
        LeaveStatus::Active,
        record.version,
    )?;

    if reverted {
        Ok(Some(Resolution::Rejected))
    } else {
        Ok(None)
    }
}

/// Leave window: overrides win; otherwise the leave starts on the anchor
/// date and runs the configured default length.
fn leave_window(
    cfg: &Config,
    record: &MonitoringRecord,
    overrides: &Overrides,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = match overrides.start_date {
        Some(d) => d,
        None => record.anchor_date.ok_or_else(|| {
            AppError::Validation(format!(
                "record {} has no anchor date; supply an explicit start date",
                record.id
            ))
        })?,
    };

    let end = match overrides.end_date {
        Some(d) => d,
        None => start + Duration::days(cfg.leave_length_days),
    };

    Ok((start, end))
}
