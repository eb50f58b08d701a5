use chrono::NaiveDate;
use rosterwatch::core::cache::TtlCache;
use rosterwatch::core::scheduler::{Clock, FixedClock, PeriodicRunner};
use std::cell::Cell;
use std::time::Duration;

#[test]
fn test_cache_returns_live_entries() {
    let mut cache: TtlCache<String, i64> = TtlCache::new(8, Duration::from_secs(60));
    cache.put("W001".to_string(), 42);

    assert_eq!(cache.get("W001"), Some(42));
    assert_eq!(cache.get("W002"), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_expires_entries_after_ttl() {
    let mut cache: TtlCache<String, i64> = TtlCache::new(8, Duration::from_millis(30));
    cache.put("W001".to_string(), 42);
    assert_eq!(cache.get("W001"), Some(42));

    std::thread::sleep(Duration::from_millis(60));

    assert_eq!(cache.get("W001"), None);
    assert!(cache.is_empty(), "expired entry is dropped on access");
}

#[test]
fn test_cache_evicts_oldest_when_full() {
    let mut cache: TtlCache<String, i64> = TtlCache::new(3, Duration::from_secs(60));
    for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
        cache.put(key.to_string(), i as i64);
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("a"), None, "oldest insert was evicted");
    assert_eq!(cache.get("d"), Some(3));
}

#[test]
fn test_cache_overwrite_does_not_grow_the_cache() {
    let mut cache: TtlCache<String, i64> = TtlCache::new(2, Duration::from_secs(60));
    cache.put("a".to_string(), 1);
    cache.put("a".to_string(), 2);
    cache.put("b".to_string(), 3);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("a"), Some(2));
    assert_eq!(cache.get("b"), Some(3));
}

#[test]
fn test_cache_invalidate_and_clear() {
    let mut cache: TtlCache<String, i64> = TtlCache::new(8, Duration::from_secs(60));
    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);

    cache.invalidate("a");
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_fixed_clock_advances_on_demand() {
    let start = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let clock = FixedClock::new(start);
    assert_eq!(clock.today(), start);

    clock.advance_days(3);
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());

    clock.set(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
}

#[test]
fn test_periodic_runner_stops_after_requested_cycles() {
    let runner = PeriodicRunner::new(Duration::from_millis(1));
    let ticks = Cell::new(0u64);

    runner.run(Some(4), || ticks.set(ticks.get() + 1));

    assert_eq!(ticks.get(), 4);
}

#[test]
fn test_periodic_runner_ticks_immediately() {
    let runner = PeriodicRunner::new(Duration::from_secs(3600));
    let ticks = Cell::new(0u64);

    // A one-cycle run must not wait for the interval first.
    runner.run(Some(1), || ticks.set(ticks.get() + 1));

    assert_eq!(ticks.get(), 1);
}
