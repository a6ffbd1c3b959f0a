//! Property-based tests for EventLog day queries and persistence.
//!
//! Uses proptest to check the per-day invariants across time zones.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use drinklog_core::day::day_of;
use drinklog_core::{DayRange, DurableStore, EntryId, EventLog};
use proptest::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Strategy Generators
// ============================================================================

/// Instants between 2000-01-01 and 2100-01-01.
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_444_800i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn amount_strategy() -> impl Strategy<Value = u32> {
    1u32..=10
}

/// Fixed offsets from UTC-12 to UTC+14 in quarter hours.
fn offset_strategy() -> impl Strategy<Value = FixedOffset> {
    (-48i32..=56).prop_map(|q| FixedOffset::east_opt(q * 15 * 60).unwrap())
}

fn entries_strategy(max: usize) -> impl Strategy<Value = Vec<(DateTime<Utc>, u32)>> {
    prop::collection::vec((instant_strategy(), amount_strategy()), 0..max)
}

fn build(entries: &[(DateTime<Utc>, u32)]) -> (EventLog, Vec<EntryId>) {
    let mut log = EventLog::new();
    let ids = entries
        .iter()
        .map(|(ts, amount)| log.add(*ts, *amount).unwrap())
        .collect();
    (log, ids)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Adding an entry raises its day's total by exactly its amount
    #[test]
    fn add_raises_day_total_by_amount(
        existing in entries_strategy(30),
        ts in instant_strategy(),
        amount in amount_strategy(),
        tz in offset_strategy(),
    ) {
        let (mut log, _) = build(&existing);
        let day = day_of(&ts, &tz);
        let before = log.total_on(day, &tz);

        log.add(ts, amount).unwrap();
        prop_assert_eq!(log.total_on(day, &tz), before + u64::from(amount));
    }

    /// Day queries never return entries outside the day's range
    #[test]
    fn query_stays_inside_day(
        entries in entries_strategy(40),
        probe in instant_strategy(),
        tz in offset_strategy(),
    ) {
        let (log, _) = build(&entries);
        let day = day_of(&probe, &tz);
        let range = DayRange::for_day(day, &tz);

        for entry in log.entries_on(day, &tz) {
            prop_assert!(range.start <= entry.timestamp());
            prop_assert!(entry.timestamp() < range.end);
        }
        prop_assert_eq!(range.end - range.start, chrono::Duration::hours(24));
    }

    /// Every entry lands in exactly one day, so day totals add up to the whole
    #[test]
    fn day_totals_partition_the_log(entries in entries_strategy(40), tz in offset_strategy()) {
        let (log, _) = build(&entries);
        let days: HashSet<_> = log.iter().map(|e| day_of(&e.timestamp(), &tz)).collect();
        let by_day: u64 = days.iter().map(|d| log.total_on(*d, &tz)).sum();
        let whole: u64 = entries.iter().map(|(_, a)| u64::from(*a)).sum();
        prop_assert_eq!(by_day, whole);
    }

    /// Deleting removes exactly the listed ids that are present
    #[test]
    fn delete_removes_exactly_present_ids(
        entries in entries_strategy(30),
        picks in prop::collection::vec(any::<bool>(), 30),
        unknown in 0usize..5,
    ) {
        let (mut log, ids) = build(&entries);
        let mut doomed: HashSet<EntryId> = ids
            .iter()
            .zip(picks.iter())
            .filter(|(_, pick)| **pick)
            .map(|(id, _)| *id)
            .collect();
        let expected_removed = doomed.len();
        doomed.extend((0..unknown).map(|_| EntryId::new()));

        let removed = log.delete(&doomed);
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(log.len(), ids.len() - expected_removed);
        for id in &ids {
            prop_assert_eq!(log.get(id).is_some(), !doomed.contains(id));
        }
    }

    /// Flushing and loading gives back the same set of entries
    #[test]
    fn flush_load_roundtrip(entries in entries_strategy(25)) {
        let dir = TempDir::new().unwrap();
        let store = DurableStore::new(dir.path().join("entries.json"));
        let (log, _) = build(&entries);

        store.flush_now(&log).unwrap();
        prop_assert_eq!(store.load().unwrap(), log);
    }
}
