//! Persistence for monitoring records.
//!
//! All mutating statements that follow a read are guarded by the record's
//! `version` column: they match `WHERE id = ? AND version = ?` and report
//! whether a row was actually updated, so callers can detect a concurrent
//! writer and retry against fresh state instead of clobbering it.

use crate::errors::{AppError, AppResult};
use crate::models::monitoring::{EntitlementTier, LeaveStatus, MonitoringRecord};
use chrono::NaiveDate;
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<MonitoringRecord> {
    let anchor: Option<String> = row.get("anchor_date")?;
    let anchor_date = match anchor {
        Some(s) => Some(parse_date_col(&s)?),
        None => None,
    };

    let next: Option<String> = row.get("next_eligible")?;
    let next_eligible = match next {
        Some(s) => Some(parse_date_col(&s)?),
        None => None,
    };

    let status_str: String = row.get("status")?;
    let status = LeaveStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    let tier_days: i64 = row.get("tier")?;
    let tier = EntitlementTier::from_days(tier_days).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(AppError::InvalidTier(tier_days.to_string())),
        )
    })?;

    Ok(MonitoringRecord {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        display_name: row.get("display_name")?,
        unit_tag: row.get("unit_tag")?,
        reporting_period: row.get("reporting_period")?,
        group_tag: row.get("group_tag")?,
        anchor_date,
        tier,
        next_eligible,
        days_remaining: row.get("days_remaining")?,
        status,
        on_site_tag: row.get("on_site_tag")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        version: row.get("version")?,
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

/// Insert or overwrite the record for `(worker_id, reporting_period)`.
/// Last write wins within a batch; re-uploads are corrective, not errors.
pub fn upsert(conn: &Connection, rec: &MonitoringRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO monitoring
            (worker_id, display_name, unit_tag, reporting_period, group_tag,
             anchor_date, tier, next_eligible, days_remaining, status,
             on_site_tag, created_at, updated_at, version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 1)
         ON CONFLICT(worker_id, reporting_period) DO UPDATE SET
            display_name = excluded.display_name,
            unit_tag = excluded.unit_tag,
            group_tag = excluded.group_tag,
            anchor_date = excluded.anchor_date,
            tier = excluded.tier,
            next_eligible = excluded.next_eligible,
            days_remaining = excluded.days_remaining,
            status = excluded.status,
            on_site_tag = excluded.on_site_tag,
            updated_at = excluded.updated_at,
            version = monitoring.version + 1",
        params![
            rec.worker_id,
            rec.display_name,
            rec.unit_tag,
            rec.reporting_period,
            rec.group_tag,
            rec.anchor_date.map(|d| d.format("%Y-%m-%d").to_string()),
            rec.tier.days(),
            rec.next_eligible.map(|d| d.format("%Y-%m-%d").to_string()),
            rec.days_remaining,
            rec.status.to_db_str(),
            rec.on_site_tag,
            rec.created_at,
            rec.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Option<MonitoringRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM monitoring WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], map_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

pub fn get_by_worker(
    conn: &Connection,
    worker_id: &str,
    period: &str,
) -> AppResult<Option<MonitoringRecord>> {
    let mut stmt =
        conn.prepare("SELECT * FROM monitoring WHERE worker_id = ?1 AND reporting_period = ?2")?;
    let mut rows = stmt.query_map(params![worker_id, period], map_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// List records, optionally narrowed by status and/or reporting period.
pub fn list(
    conn: &Connection,
    status: Option<LeaveStatus>,
    period: Option<&str>,
) -> AppResult<Vec<MonitoringRecord>> {
    let mut sql = String::from("SELECT * FROM monitoring WHERE 1=1");
    let mut args: Vec<String> = Vec::new();

    if let Some(s) = status {
        args.push(s.to_db_str().to_string());
        sql.push_str(&format!(" AND status = ?{}", args.len()));
    }
    if let Some(p) = period {
        args.push(p.to_string());
        sql.push_str(&format!(" AND reporting_period = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY worker_id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> =
        args.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let rows = stmt.query_map(rusqlite::params_from_iter(params), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Write recomputed derived fields. Returns false when the version guard
/// did not match (a concurrent writer got there first).
pub fn update_derived(
    conn: &Connection,
    id: i64,
    days_remaining: Option<i64>,
    status: LeaveStatus,
    next_eligible: Option<NaiveDate>,
    expected_version: i64,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE monitoring
         SET days_remaining = ?1, status = ?2, next_eligible = ?3,
             updated_at = ?4, version = version + 1
         WHERE id = ?5 AND version = ?6",
        params![
            days_remaining,
            status.to_db_str(),
            next_eligible.map(|d| d.format("%Y-%m-%d").to_string()),
            MonitoringRecord::now_iso(),
            id,
            expected_version,
        ],
    )?;
    Ok(n == 1)
}

/// Transition `status` only when the record still holds `from` under the
/// expected version. This is the approval claim: exactly one caller wins.
pub fn transition_status(
    conn: &Connection,
    id: i64,
    from: LeaveStatus,
    to: LeaveStatus,
    expected_version: i64,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE monitoring
         SET status = ?1, updated_at = ?2, version = version + 1
         WHERE id = ?3 AND status = ?4 AND version = ?5",
        params![
            to.to_db_str(),
            MonitoringRecord::now_iso(),
            id,
            from.to_db_str(),
            expected_version,
        ],
    )?;
    Ok(n == 1)
}

/// Reset the anchor and derived fields together; used when a completed
/// leave restarts the countdown from its end date.
pub fn reset_anchor(
    conn: &Connection,
    id: i64,
    anchor: NaiveDate,
    days_remaining: Option<i64>,
    status: LeaveStatus,
    next_eligible: Option<NaiveDate>,
    expected_version: i64,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE monitoring
         SET anchor_date = ?1, days_remaining = ?2, status = ?3,
             next_eligible = ?4, updated_at = ?5, version = version + 1
         WHERE id = ?6 AND version = ?7",
        params![
            anchor.format("%Y-%m-%d").to_string(),
            days_remaining,
            status.to_db_str(),
            next_eligible.map(|d| d.format("%Y-%m-%d").to_string()),
            MonitoringRecord::now_iso(),
            id,
            expected_version,
        ],
    )?;
    Ok(n == 1)
}

/// Administrative bulk clear for a reporting period. Returns the number
/// of deleted records.
pub fn clear_period(conn: &Connection, period: &str) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM monitoring WHERE reporting_period = ?1",
        [period],
    )?;
    Ok(n)
}
