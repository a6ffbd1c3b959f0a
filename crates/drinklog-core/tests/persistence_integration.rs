//! Integration tests for the entry log, its backing file and the save worker.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use drinklog_core::{
    AppContext, Config, CoreError, DurableStore, EventLog, SaveScheduler, SaveStatus,
    WidgetSummary,
};
use tempfile::TempDir;

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_empty_store_scenario() {
    let dir = TempDir::new().unwrap();
    let store = DurableStore::new(dir.path().join("entries.json"));

    let log = store.load().unwrap();
    assert_eq!(log.len(), 0);
    assert_eq!(log.total_on(drinklog_core::day::today(&Utc), &Utc), 0);
}

#[test]
fn test_flush_then_load_reproduces_entries() {
    let dir = TempDir::new().unwrap();
    let store = DurableStore::new(dir.path().join("entries.json"));

    let mut log = EventLog::new();
    log.add(at("2024-01-01T10:00:00Z"), 2).unwrap();
    log.add(at("2024-01-01T23:00:00Z"), 1).unwrap();
    log.add(at("2023-12-30T07:15:00Z"), 4).unwrap();
    store.flush_now(&log).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, log);
    assert_eq!(loaded.total_on(date(2024, 1, 1), &Utc), 3);
    assert_eq!(loaded.entries_on(date(2024, 1, 1), &Utc).len(), 2);
}

#[test]
fn test_corrupt_backing_file_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entries.json");
    std::fs::write(&path, r#"[{"id": "abc", "timestamp": 12, "amount": "two"}]"#).unwrap();

    match DurableStore::new(&path).load() {
        Err(CoreError::CorruptData { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected corrupt data error, got {other:?}"),
    }
}

#[test]
fn test_backing_file_is_readable_json_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entries.json");
    let store = DurableStore::new(&path);

    let mut log = EventLog::new();
    let id = log.add(at("2024-01-01T10:00:00Z"), 2).unwrap();
    store.flush_now(&log).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["id"], id.to_string());
    assert_eq!(raw[0]["timestamp"], "2024-01-01T10:00:00Z");
    assert_eq!(raw[0]["amount"], 2);
}

#[test]
fn test_widget_reads_independently() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entries.json");
    let writer = DurableStore::new(&path);
    let reader = DurableStore::new(&path);

    let today = date(2024, 1, 3);
    assert!(WidgetSummary::build(&reader.load().unwrap(), today, 3, &Utc)
        .stats
        .iter()
        .all(|s| s.total == 0));

    let mut log = EventLog::new();
    log.add(at("2024-01-03T08:00:00Z"), 2).unwrap();
    writer.flush_now(&log).unwrap();

    let summary = WidgetSummary::build(&reader.load().unwrap(), today, 3, &Utc);
    assert_eq!(summary.stats[0].total, 2);
    assert_eq!(summary.last_entry, Some(at("2024-01-03T08:00:00Z")));
}

#[tokio::test]
async fn test_scheduled_saves_coalesce_to_last_content() {
    let dir = TempDir::new().unwrap();
    let store = DurableStore::new(dir.path().join("entries.json"));
    let saver = SaveScheduler::spawn(store.clone(), Duration::from_millis(100));

    let mut log = EventLog::new();
    for hour in 0..10 {
        log.add(at("2024-01-01T00:00:00Z") + chrono::Duration::hours(hour), 1)
            .unwrap();
        saver.schedule_save(&log);
    }
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(saver.flush_count(), 1);
    assert_eq!(store.load().unwrap(), log);
    saver.shutdown(None).await.unwrap();
}

#[tokio::test]
async fn test_app_keeps_session_data_when_flush_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut config = Config::default();
    config.storage.save_debounce_ms = 20;
    let store = DurableStore::new(blocker.join("entries.json"));
    let mut app = AppContext::open_with(config, store, Utc).unwrap();

    let id = app.add_entry(Utc::now(), 1).unwrap();
    let mut status = app.subscribe();
    let reached = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if matches!(*status.borrow_and_update(), SaveStatus::Failed(_)) {
                break;
            }
            status.changed().await.unwrap();
        }
    })
    .await;
    assert!(reached.is_ok());

    assert!(app.log().get(&id).is_some());
    assert_eq!(app.total_on(app.today()), 1);
    assert!(app.shutdown().await.is_err());
}

#[tokio::test]
async fn test_second_day_does_not_affect_first() {
    let dir = TempDir::new().unwrap();
    let store = DurableStore::new(dir.path().join("entries.json"));
    let mut app = AppContext::open_with(Config::default(), store.clone(), Utc).unwrap();

    app.add_entry(at("2024-01-01T12:00:00Z"), 2).unwrap();
    let before = app.total_on(date(2024, 1, 1));
    app.add_entry(at("2024-01-02T12:00:00Z"), 5).unwrap();
    assert_eq!(app.total_on(date(2024, 1, 1)), before);

    app.delete_entries(&HashSet::new());
    app.shutdown().await.unwrap();
    assert_eq!(store.load().unwrap().len(), 2);
}
