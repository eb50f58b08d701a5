#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rw() -> Command {
    cargo_bin_cmd!("rosterwatch")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rosterwatch.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write a roster CSV with the given data lines (header included here).
pub fn write_roster_csv(name: &str, data_lines: &[String]) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_roster.csv", name));
    let p = path.to_string_lossy().to_string();

    let mut content =
        String::from("worker_id,name,unit,group,tier,last_leave_date,on_site\n");
    for line in data_lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&p, content).expect("write roster csv");
    p
}

/// Initialize the schema in a fresh DB via the CLI.
pub fn init_db_file(db_path: &str) {
    rw()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Open an in-memory database with the full schema, for library tests.
pub fn memory_db() -> rusqlite::Connection {
    let pool = rosterwatch::db::pool::DbPool::in_memory().expect("open in-memory db");
    rosterwatch::db::initialize::init_db(&pool.conn).expect("init schema");
    pool.conn
}

/// Engine configuration for library tests; the database path is unused
/// because the connection is handed in directly.
pub fn test_config() -> rosterwatch::config::Config {
    rosterwatch::config::Config {
        database: ":memory:".to_string(),
        ..Default::default()
    }
}
