mod common;
use common::{memory_db, test_config};

use chrono::{Duration, NaiveDate};
use rosterwatch::core::approval::{Decision, Overrides, resolve};
use rosterwatch::core::ingest::ingest_roster;
use rosterwatch::core::recompute::recompute_all;
use rosterwatch::db::monitoring;
use rosterwatch::models::monitoring::LeaveStatus;
use rosterwatch::models::raw_row::RawRow;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2025, 6, 15)
}

fn seed(conn: &mut rusqlite::Connection, worker: &str, anchor_offset_days: i64) {
    let cfg = test_config();
    let anchor = today() + Duration::days(anchor_offset_days);
    let rows = vec![RawRow {
        row_number: 1,
        worker_id: worker.to_string(),
        display_name: format!("Worker {}", worker),
        tier: "70".to_string(),
        anchor_date: anchor.format("%Y-%m-%d").to_string(),
        ..Default::default()
    }];
    ingest_roster(conn, &cfg, today(), "2025-06", &rows).unwrap();
}

#[test]
fn test_recompute_is_idempotent_with_no_elapsed_time() {
    let mut conn = memory_db();
    let cfg = test_config();
    seed(&mut conn, "W001", 30);
    seed(&mut conn, "W002", 5);
    seed(&mut conn, "W003", -2);

    // Ingest already derived for "today", so the first run writes nothing.
    let first = recompute_all(&conn, &cfg, today()).unwrap();
    assert_eq!(first.examined, 3);
    assert_eq!(first.updated, 0);

    let before: Vec<i64> = monitoring::list(&conn, None, None)
        .unwrap()
        .iter()
        .map(|r| r.version)
        .collect();

    let second = recompute_all(&conn, &cfg, today()).unwrap();
    assert_eq!(second.updated, 0, "second run must produce zero writes");

    let after: Vec<i64> = monitoring::list(&conn, None, None)
        .unwrap()
        .iter()
        .map(|r| r.version)
        .collect();
    assert_eq!(before, after, "no version was bumped");
}

#[test]
fn test_time_advance_moves_statuses_forward() {
    let mut conn = memory_db();
    let cfg = test_config();
    seed(&mut conn, "W001", 12); // active today

    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    assert_eq!(rec.status, LeaveStatus::Active);

    // Two days later the record crosses into the due window.
    let stats = recompute_all(&conn, &cfg, today() + Duration::days(2)).unwrap();
    assert_eq!(stats.updated, 1);
    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    assert_eq!(rec.status, LeaveStatus::Due);
    assert_eq!(rec.days_remaining, Some(10));

    // Two weeks later it is overdue.
    recompute_all(&conn, &cfg, today() + Duration::days(14)).unwrap();
    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    assert_eq!(rec.status, LeaveStatus::Overdue);
    assert_eq!(rec.days_remaining, Some(-2));
}

#[test]
fn test_recompute_leaves_pinned_records_alone_while_leave_runs() {
    let mut conn = memory_db();
    let cfg = test_config();
    seed(&mut conn, "W001", 5); // due today

    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    resolve(&mut conn, &cfg, today(), rec.id, Decision::Approve, &Overrides::default()).unwrap();

    // Leave runs from day 5 for leave_length_days; recompute mid-leave.
    let mid_leave = today() + Duration::days(7);
    let stats = recompute_all(&conn, &cfg, mid_leave).unwrap();
    assert_eq!(stats.updated, 0);
    assert_eq!(stats.completed_leaves, 0);

    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    assert_eq!(rec.status, LeaveStatus::OnLeave, "pin must survive recompute");
}

#[test]
fn test_recompute_completes_ended_leave_with_fresh_anchor() {
    let mut conn = memory_db();
    let cfg = test_config();
    seed(&mut conn, "W001", 5);

    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    resolve(&mut conn, &cfg, today(), rec.id, Decision::Approve, &Overrides::default()).unwrap();

    let leave_start = today() + Duration::days(5);
    let leave_end = leave_start + Duration::days(cfg.leave_length_days);

    // The day after the leave ends, the pin is released and the
    // countdown restarts from the end date.
    let after = leave_end + Duration::days(1);
    let stats = recompute_all(&conn, &cfg, after).unwrap();
    assert_eq!(stats.completed_leaves, 1);

    let rec = monitoring::get_by_worker(&conn, "W001", "2025-06").unwrap().unwrap();
    assert_eq!(rec.status, LeaveStatus::Active);
    assert_eq!(rec.anchor_date, Some(leave_end + Duration::days(70)));
    assert_eq!(rec.days_remaining, Some(69));

    // And the completion itself is idempotent.
    let again = recompute_all(&conn, &cfg, after).unwrap();
    assert_eq!(again.completed_leaves, 0);
    assert_eq!(again.updated, 0);
}

#[test]
fn test_unscheduled_records_stay_unscheduled() {
    let mut conn = memory_db();
    let cfg = test_config();

    let rows = vec![RawRow {
        row_number: 1,
        worker_id: "W009".to_string(),
        display_name: "No Anchor".to_string(),
        tier: "70".to_string(),
        anchor_date: String::new(),
        ..Default::default()
    }];
    ingest_roster(&mut conn, &cfg, today(), "2025-06", &rows).unwrap();

    let stats = recompute_all(&conn, &cfg, today() + Duration::days(100)).unwrap();
    assert_eq!(stats.updated, 0);

    let rec = monitoring::get_by_worker(&conn, "W009", "2025-06").unwrap().unwrap();
    assert_eq!(rec.status, LeaveStatus::Unscheduled);
    assert_eq!(rec.days_remaining, None);
}
