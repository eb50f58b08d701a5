//! Operation log: one row per engine operation (ingest batch, recompute
//! run, approval, reminder run), kept in the database for auditability.

use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};

pub fn log_operation(
    conn: &Connection,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
        params![Local::now().to_rfc3339(), operation, target, message],
    )?;
    Ok(())
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<(String, String, String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT date, operation, target, message FROM log ORDER BY date DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
