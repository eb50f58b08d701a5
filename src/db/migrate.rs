use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the operation `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `monitoring` table with the modern schema (including `version`).
fn create_monitoring_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS monitoring (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id        TEXT NOT NULL,
            display_name     TEXT NOT NULL,
            unit_tag         TEXT,
            reporting_period TEXT NOT NULL,
            group_tag        TEXT,
            anchor_date      TEXT,
            tier             INTEGER NOT NULL DEFAULT 70 CHECK(tier IN (70, 35)),
            next_eligible    TEXT,
            days_remaining   INTEGER,
            status           TEXT NOT NULL DEFAULT 'unscheduled'
                             CHECK(status IN ('unscheduled','active','due','overdue','on_leave')),
            on_site_tag      TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL,
            version          INTEGER NOT NULL DEFAULT 1,
            UNIQUE(worker_id, reporting_period)
        );

        CREATE INDEX IF NOT EXISTS idx_monitoring_status ON monitoring(status);
        CREATE INDEX IF NOT EXISTS idx_monitoring_period ON monitoring(reporting_period);
        "#,
    )?;
    Ok(())
}

fn create_leave_requests_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id  TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date   TEXT NOT NULL,
            leave_type TEXT NOT NULL DEFAULT 'annual',
            attachment TEXT,
            status     TEXT NOT NULL DEFAULT 'approved'
                       CHECK(status IN ('approved','pending','rejected')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_leave_requests_status_start
            ON leave_requests(status, start_date);
        "#,
    )?;
    Ok(())
}

fn create_reminder_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS reminder_dedup (
            leave_request_id INTEGER NOT NULL,
            tier             INTEGER NOT NULL,
            sent_at          TEXT NOT NULL,
            UNIQUE(leave_request_id, tier)
        );

        CREATE TABLE IF NOT EXISTS reminder_history (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            leave_request_id INTEGER NOT NULL,
            worker_id        TEXT NOT NULL,
            tier             INTEGER NOT NULL,
            sent_at          TEXT NOT NULL,
            destination      TEXT NOT NULL,
            message          TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// The worker directory is owned by the surrounding application; the
/// schema is created here so a fresh database is usable stand-alone.
fn create_workers_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS workers (
            id    TEXT PRIMARY KEY,
            name  TEXT NOT NULL,
            phone TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Migrate a pre-0.3 `monitoring` table to include the `version` column
/// used by the optimistic write guard.
fn migrate_add_version_to_monitoring(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "monitoring")? {
        return Ok(());
    }

    if has_column(conn, "monitoring", "version")? {
        return Ok(());
    }

    warning("Adding 'version' column to monitoring table...");

    conn.execute_batch(
        r#"
        ALTER TABLE monitoring ADD COLUMN version INTEGER NOT NULL DEFAULT 1;
        "#,
    )?;

    success("'version' column added.");
    Ok(())
}

/// Run all pending migrations. Safe to call on every startup; each step
/// is a no-op when the schema is already current.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    create_monitoring_table(conn)?;
    create_leave_requests_table(conn)?;
    create_reminder_tables(conn)?;
    create_workers_table(conn)?;
    migrate_add_version_to_monitoring(conn)?;
    Ok(())
}
