//! Read side of the worker directory table. The surrounding application
//! owns employee CRUD; the engine only looks up contact details.

use crate::errors::AppResult;
use crate::gateway::WorkerContact;
use rusqlite::{Connection, params};

pub fn get_worker(conn: &Connection, id: &str) -> AppResult<Option<WorkerContact>> {
    let mut stmt = conn.prepare("SELECT id, name, phone FROM workers WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], |row| {
        Ok(WorkerContact {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
        })
    })?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

/// Seed helper used by tests and by deployments without the full
/// employee application.
pub fn upsert_worker(conn: &Connection, id: &str, name: &str, phone: Option<&str>) -> AppResult<()> {
    conn.execute(
        "INSERT INTO workers (id, name, phone) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, phone = excluded.phone",
        params![id, name, phone],
    )?;
    Ok(())
}
