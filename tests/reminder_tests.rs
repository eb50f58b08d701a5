mod common;
use common::{memory_db, test_config};

use chrono::{Duration, NaiveDate};
use rosterwatch::core::reminders::{plan_due_reminders, send_due_reminders};
use rosterwatch::db::{leave_requests, log, reminders, workers};
use rosterwatch::errors::{AppError, AppResult};
use rosterwatch::gateway::{NotificationGateway, SqliteDirectory};
use std::cell::{Cell, RefCell};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2025, 6, 15)
}

/// Gateway that records every send and can be switched to fail.
#[derive(Default)]
struct RecordingGateway {
    sent: RefCell<Vec<(String, String)>>,
    failing: Cell<bool>,
}

impl NotificationGateway for RecordingGateway {
    fn send(&self, destination: &str, message: &str) -> AppResult<()> {
        if self.failing.get() {
            return Err(AppError::Transport("simulated outage".to_string()));
        }
        self.sent
            .borrow_mut()
            .push((destination.to_string(), message.to_string()));
        Ok(())
    }
}

fn seed_worker(conn: &rusqlite::Connection, id: &str, phone: Option<&str>) {
    workers::upsert_worker(conn, id, &format!("Worker {}", id), phone).unwrap();
}

fn seed_leave(conn: &rusqlite::Connection, worker: &str, start_in_days: i64) -> i64 {
    let start = today() + Duration::days(start_in_days);
    leave_requests::create(
        conn,
        worker,
        start,
        start + Duration::days(14),
        "annual",
        None,
        "approved",
        "2025-06-01T00:00:00+00:00",
    )
    .unwrap()
}

#[test]
fn test_only_exact_tier_offsets_are_due() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    seed_worker(&conn, "W002", Some("+62822222"));
    seed_worker(&conn, "W003", Some("+62833333"));

    seed_leave(&conn, "W001", 7); // due (7-day tier)
    seed_leave(&conn, "W002", 5); // not a tier
    seed_leave(&conn, "W003", 1); // due (1-day tier)

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);
    let run = send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();

    assert_eq!(run.sent, 2);
    assert_eq!(run.failed, 0);

    let sent = gateway.sent.borrow();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|(dest, _)| dest == "+62811111"));
    assert!(sent.iter().any(|(dest, _)| dest == "+62833333"));
    // The 1-day reminder reads naturally.
    let (_, msg) = sent.iter().find(|(dest, _)| dest == "+62833333").unwrap();
    assert!(msg.contains("tomorrow"), "got: {}", msg);
}

#[test]
fn test_same_day_rerun_sends_at_most_once_per_tier() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    let leave_id = seed_leave(&conn, "W001", 3);

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);

    let first = send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();
    assert_eq!(first.sent, 1);

    // Manual trigger later the same day: dedup record blocks the repeat.
    let second = send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();
    assert_eq!(second.sent, 0);
    assert_eq!(second.failed, 0);

    assert_eq!(gateway.sent.borrow().len(), 1);
    assert!(reminders::dedup_exists(&conn, leave_id, 3).unwrap());
}

#[test]
fn test_each_tier_fires_once_as_the_date_approaches() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    let leave_id = seed_leave(&conn, "W001", 7);

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);

    // Day 0: 7-day tier. Day 4: 3-day tier. Day 6: 1-day tier.
    for (advance, expected_tier) in [(0, 7), (4, 3), (6, 1)] {
        let run =
            send_due_reminders(&conn, &cfg, &directory, &gateway, today() + Duration::days(advance))
                .unwrap();
        assert_eq!(run.sent, 1);
        assert!(reminders::dedup_exists(&conn, leave_id, expected_tier).unwrap());
    }

    assert_eq!(gateway.sent.borrow().len(), 3);
    let history = reminders::load_history(&conn).unwrap();
    assert_eq!(history.len(), 3);
}

#[test]
fn test_transport_failure_leaves_no_dedup_so_next_run_retries() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    let leave_id = seed_leave(&conn, "W001", 3);

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);

    gateway.failing.set(true);
    let run = send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();
    assert_eq!(run.sent, 0);
    assert_eq!(run.failed, 1);
    assert!(!reminders::dedup_exists(&conn, leave_id, 3).unwrap());
    assert!(reminders::load_history(&conn).unwrap().is_empty());

    // Transport recovers; the retry goes out and is then marked handled.
    gateway.failing.set(false);
    let run = send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();
    assert_eq!(run.sent, 1);
    assert!(reminders::dedup_exists(&conn, leave_id, 3).unwrap());
}

#[test]
fn test_unreachable_worker_counts_as_failed_but_never_aborts() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", None); // no phone
    seed_worker(&conn, "W003", Some("+62833333"));
    seed_leave(&conn, "W001", 3);
    seed_leave(&conn, "W002", 3); // not in the directory at all
    seed_leave(&conn, "W003", 3);

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);
    let run = send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();

    assert_eq!(run.sent, 1);
    assert_eq!(run.failed, 2);
    assert_eq!(gateway.sent.borrow().len(), 1);
}

#[test]
fn test_planning_reports_due_reminders_without_writing_anything() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    let leave_id = seed_leave(&conn, "W001", 7);
    seed_leave(&conn, "W002", 5); // not a tier, never planned

    let planned = plan_due_reminders(&conn, &cfg, today()).unwrap();
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].leave_request_id, leave_id);
    assert_eq!(planned[0].worker_id, "W001");
    assert_eq!(planned[0].tier, 7);
    assert_eq!(planned[0].start_date, today() + Duration::days(7));

    // Planning leaves no trace: no dedup, no history, no log row, and a
    // second plan on the same day reports the same reminder again.
    assert!(!reminders::dedup_exists(&conn, leave_id, 7).unwrap());
    assert!(reminders::load_history(&conn).unwrap().is_empty());
    assert!(log::load_log(&conn).unwrap().is_empty());
    assert_eq!(plan_due_reminders(&conn, &cfg, today()).unwrap().len(), 1);
}

#[test]
fn test_planning_skips_already_handled_tiers() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    seed_leave(&conn, "W001", 3);

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);
    send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();

    // The real run wrote the dedup record; the plan is now empty.
    assert!(plan_due_reminders(&conn, &cfg, today()).unwrap().is_empty());
}

#[test]
fn test_history_entries_carry_the_audit_fields() {
    let conn = memory_db();
    let cfg = test_config();
    seed_worker(&conn, "W001", Some("+62811111"));
    let leave_id = seed_leave(&conn, "W001", 7);

    let gateway = RecordingGateway::default();
    let directory = SqliteDirectory::new(&conn);
    send_due_reminders(&conn, &cfg, &directory, &gateway, today()).unwrap();

    let history = reminders::load_history(&conn).unwrap();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.leave_request_id, leave_id);
    assert_eq!(entry.worker_id, "W001");
    assert_eq!(entry.tier, 7);
    assert_eq!(entry.destination, "+62811111");
    assert!(entry.message.contains("Worker W001"));
    assert!(!entry.sent_at.is_empty());
}
