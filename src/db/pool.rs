//! SQLite connection wrapper (lightweight for CLI usage).

use crate::utils::path::expand_tilde;
use rusqlite::{Connection, Result};
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(expand_tilde(path))?;
        // The watch runner and an interactive resolve may hit the file
        // at the same moment; wait instead of failing with SQLITE_BUSY.
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self { conn })
    }

    /// In-memory database, used by library-level tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }
}
