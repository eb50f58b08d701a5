//! Leave-request collaborator storage.
//!
//! The surrounding application owns leave requests end to end; this engine
//! only creates approved ones (ApprovalBridge) and reads approved upcoming
//! ones (ReminderPipeline).

use crate::errors::{AppError, AppResult};
use crate::models::leave_request::LeaveRequest;
use chrono::NaiveDate;
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<LeaveRequest> {
    let start_str: String = row.get("start_date")?;
    let end_str: String = row.get("end_date")?;

    let start_date = parse_date_col(&start_str)?;
    let end_date = parse_date_col(&end_str)?;

    Ok(LeaveRequest {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        start_date,
        end_date,
        leave_type: row.get("leave_type")?,
        attachment: row.get("attachment")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_date_col(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(s.to_string())),
        )
    })
}

/// Create a leave request and return its id.
#[allow(clippy::too_many_arguments)]
pub fn create(
    conn: &Connection,
    worker_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    leave_type: &str,
    attachment: Option<&str>,
    status: &str,
    created_at: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO leave_requests
            (worker_id, start_date, end_date, leave_type, attachment, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            worker_id,
            start_date.format("%Y-%m-%d").to_string(),
            end_date.format("%Y-%m-%d").to_string(),
            leave_type,
            attachment,
            status,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Approved leave requests whose start date is still in the future.
pub fn list_approved_upcoming(conn: &Connection, today: NaiveDate) -> AppResult<Vec<LeaveRequest>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM leave_requests
         WHERE status = 'approved' AND start_date > ?1
         ORDER BY start_date ASC",
    )?;

    let rows = stmt.query_map([today.format("%Y-%m-%d").to_string()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The most recent approved leave for a worker, by start date.
/// Used by the recompute pass to detect a completed leave period.
pub fn latest_approved_for_worker(
    conn: &Connection,
    worker_id: &str,
) -> AppResult<Option<LeaveRequest>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM leave_requests
         WHERE status = 'approved' AND worker_id = ?1
         ORDER BY start_date DESC
         LIMIT 1",
    )?;

    let mut rows = stmt.query_map([worker_id], map_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

pub fn count_for_worker(conn: &Connection, worker_id: &str) -> AppResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM leave_requests WHERE worker_id = ?1",
        [worker_id],
        |row| row.get(0),
    )?;
    Ok(n)
}
