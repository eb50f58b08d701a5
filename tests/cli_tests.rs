mod common;
use common::{init_db_file, rw, setup_test_db, temp_out, write_roster_csv};

use chrono::{Duration, Local};
use predicates::prelude::*;
use std::fs;

fn today_plus(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn test_init_creates_the_schema() {
    let db = setup_test_db("cli_init");

    rw().args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database schema initialized."));

    // A second init on the same file is harmless.
    rw().args(["--db", &db, "--test", "init"]).assert().success();
}

#[test]
fn test_ingest_reports_per_row_failures() {
    let db = setup_test_db("cli_ingest");
    init_db_file(&db);

    let csv = write_roster_csv(
        "cli_ingest",
        &[
            format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(40)),
            format!("W002,Siti Rahayu,LV-102,Alpha,35,{},yes", today_plus(5)),
            ",No Id,LV-103,Alpha,70,2025-09-01,yes".to_string(),
        ],
    );

    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "2025-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 1 failed"))
        .stdout(predicate::str::contains("row 3:"));
}

#[test]
fn test_list_shows_records_and_honours_filters() {
    let db = setup_test_db("cli_list");
    init_db_file(&db);

    let csv = write_roster_csv(
        "cli_list",
        &[
            format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(40)),
            format!("W002,Siti Rahayu,LV-102,Alpha,35,{},yes", today_plus(5)),
        ],
    );
    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "2025-06"])
        .assert()
        .success();

    rw().args(["--db", &db, "--test", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("W001"))
        .stdout(predicate::str::contains("W002"))
        .stdout(predicate::str::contains("2 record(s)."));

    // Only the worker inside the due window survives the filter.
    rw().args(["--db", &db, "--test", "list", "--status", "due"])
        .assert()
        .success()
        .stdout(predicate::str::contains("W002"))
        .stdout(predicate::str::contains("W001").not());

    rw().args(["--db", &db, "--test", "list", "--status", "nonsense"])
        .assert()
        .failure();
}

#[test]
fn test_resolve_approve_then_repeat_is_a_noop() {
    let db = setup_test_db("cli_resolve");
    init_db_file(&db);

    let csv = write_roster_csv(
        "cli_resolve",
        &[format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(5))],
    );
    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "2025-06"])
        .assert()
        .success();

    rw().args(["--db", &db, "--test", "resolve", "1", "--approve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Approved: leave request"));

    rw().args(["--db", &db, "--test", "resolve", "1", "--approve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already resolved"));

    rw().args(["--db", &db, "--test", "list", "--status", "on_leave"])
        .assert()
        .success()
        .stdout(predicate::str::contains("W001"));
}

#[test]
fn test_resolve_requires_exactly_one_decision() {
    let db = setup_test_db("cli_resolve_flags");
    init_db_file(&db);

    rw().args(["--db", &db, "--test", "resolve", "1"])
        .assert()
        .failure();

    // --approve and --reject together are refused by the parser.
    rw().args(["--db", &db, "--test", "resolve", "1", "--approve", "--reject"])
        .assert()
        .failure();
}

#[test]
fn test_recompute_and_remind_run_cleanly_on_a_fresh_db() {
    let db = setup_test_db("cli_recompute");
    init_db_file(&db);

    rw().args(["--db", &db, "--test", "recompute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 examined"));

    rw().args(["--db", &db, "--test", "remind", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 reminder(s) would be sent"));

    rw().args(["--db", &db, "--test", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reminders have been sent yet."));
}

#[test]
fn test_export_monitoring_to_csv_and_json() {
    let db = setup_test_db("cli_export");
    init_db_file(&db);

    let csv_in = write_roster_csv(
        "cli_export",
        &[format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(40))],
    );
    rw().args(["--db", &db, "--test", "ingest", &csv_in, "--period", "2025-06"])
        .assert()
        .success();

    let out_csv = temp_out("cli_export", "csv");
    rw().args([
        "--db", &db, "--test", "export", "monitoring", "--format", "csv", "-o", &out_csv,
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Exported 1 monitoring record(s)"));

    let content = fs::read_to_string(&out_csv).expect("read exported csv");
    assert!(content.contains("W001"));
    assert!(content.contains("Budi Santoso"));

    let out_json = temp_out("cli_export_j", "json");
    rw().args([
        "--db", &db, "--test", "export", "monitoring", "--format", "json", "-o", &out_json,
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out_json).expect("read exported json");
    assert!(content.contains("\"worker_id\""));

    rw().args([
        "--db", &db, "--test", "export", "nonsense", "-o", &temp_out("cli_export_x", "csv"),
    ])
    .assert()
    .failure();
}

#[test]
fn test_clear_deletes_only_the_named_period() {
    let db = setup_test_db("cli_clear");
    init_db_file(&db);

    let csv = write_roster_csv(
        "cli_clear",
        &[format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(40))],
    );
    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "2025-05"])
        .assert()
        .success();
    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "2025-06"])
        .assert()
        .success();

    rw().args(["--db", &db, "--test", "clear", "--period", "2025-05", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 record(s) for period 2025-05."));

    rw().args(["--db", &db, "--test", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-06"))
        .stdout(predicate::str::contains("2025-05").not());
}

#[test]
fn test_operation_log_records_ingest_and_clear() {
    let db = setup_test_db("cli_log");
    init_db_file(&db);

    let csv = write_roster_csv(
        "cli_log",
        &[format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(40))],
    );
    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "2025-06"])
        .assert()
        .success();
    rw().args(["--db", &db, "--test", "clear", "--period", "2025-06", "--yes"])
        .assert()
        .success();

    rw().args(["--db", &db, "--test", "log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("clear"));
}

#[test]
fn test_watch_runs_the_requested_cycles_and_exits() {
    let db = setup_test_db("cli_watch");
    init_db_file(&db);

    rw().args([
        "--db", &db, "--test", "watch", "--interval-secs", "1", "--cycles", "2",
    ])
    .timeout(std::time::Duration::from_secs(30))
    .assert()
    .success()
    .stdout(predicate::str::contains("recompute: 0 examined"));
}

#[test]
fn test_invalid_period_is_refused() {
    let db = setup_test_db("cli_badperiod");
    init_db_file(&db);

    let csv = write_roster_csv(
        "cli_badperiod",
        &[format!("W001,Budi Santoso,LV-101,Alpha,70,{},yes", today_plus(40))],
    );

    rw().args(["--db", &db, "--test", "ingest", &csv, "--period", "June-2025"])
        .assert()
        .failure();

    rw().args(["--db", &db, "--test", "clear", "--period", "2025/06", "--yes"])
        .assert()
        .failure();
}
