//! Reminder dedup markers and the append-only dispatch history.

use crate::errors::AppResult;
use crate::models::reminder::ReminderHistoryEntry;
use rusqlite::{Connection, Result, Row, params};

/// Existence of a dedup row means the reminder for that tier was already
/// sent; repeated daily runs and manual triggers must skip it.
pub fn dedup_exists(conn: &Connection, leave_request_id: i64, tier: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM reminder_dedup WHERE leave_request_id = ?1 AND tier = ?2 LIMIT 1",
    )?;
    let exists = stmt.exists(params![leave_request_id, tier])?;
    Ok(exists)
}

/// Persist the dedup marker. `INSERT OR IGNORE` keeps a same-day race
/// between the scheduled run and a manual trigger harmless.
pub fn insert_dedup(
    conn: &Connection,
    leave_request_id: i64,
    tier: i64,
    sent_at: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO reminder_dedup (leave_request_id, tier, sent_at)
         VALUES (?1, ?2, ?3)",
        params![leave_request_id, tier, sent_at],
    )?;
    Ok(())
}

pub fn append_history(conn: &Connection, entry: &ReminderHistoryEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO reminder_history
            (leave_request_id, worker_id, tier, sent_at, destination, message)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.leave_request_id,
            entry.worker_id,
            entry.tier,
            entry.sent_at,
            entry.destination,
            entry.message,
        ],
    )?;
    Ok(())
}

pub fn map_history_row(row: &Row) -> Result<ReminderHistoryEntry> {
    Ok(ReminderHistoryEntry {
        id: row.get("id")?,
        leave_request_id: row.get("leave_request_id")?,
        worker_id: row.get("worker_id")?,
        tier: row.get("tier")?,
        sent_at: row.get("sent_at")?,
        destination: row.get("destination")?,
        message: row.get("message")?,
    })
}

pub fn load_history(conn: &Connection) -> AppResult<Vec<ReminderHistoryEntry>> {
    let mut stmt = conn.prepare("SELECT * FROM reminder_history ORDER BY sent_at DESC, id DESC")?;
    let rows = stmt.query_map([], map_history_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
