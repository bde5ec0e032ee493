use avecma_core::model::tracker::PeriodLog;
use avecma_core::store::{KvStore, SqliteStore, StorageKey, UserScope};
use avecma_core::{LoadLevel, MonthKey, Task};
use chrono::NaiveDate;
use std::collections::BTreeSet;

fn sample_task() -> Task {
    Task {
        id: 1_767_600_000_000,
        title: "Baby yoga".to_string(),
        description: "bring mat".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        time: "09:30".to_string(),
        load: Some(LoadLevel::Light),
        is_all_day: false,
        completed: false,
    }
}

#[test]
fn documents_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("avecma.db");
    let scope = UserScope::new(Some("mama@example.com"));

    {
        let store = SqliteStore::open(&path).unwrap();
        store
            .save(&scope, StorageKey::CalendarEvents, &vec![sample_task()])
            .unwrap();
        let mut periods = PeriodLog::new();
        periods.insert(MonthKey::new(2026, 0).unwrap(), BTreeSet::from([5, 6, 7]));
        store.save(&scope, StorageKey::Periods, &periods).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let tasks: Vec<Task> = store
        .load(&scope, StorageKey::CalendarEvents)
        .unwrap()
        .unwrap();
    assert_eq!(tasks, vec![sample_task()]);

    let periods: PeriodLog = store.load_or_default(&scope, StorageKey::Periods).unwrap();
    assert_eq!(
        periods.get(&MonthKey::new(2026, 0).unwrap()),
        Some(&BTreeSet::from([5, 6, 7]))
    );
}

#[test]
fn stored_json_uses_client_field_names() {
    let store = SqliteStore::open_in_memory().unwrap();
    let scope = UserScope::guest();
    store
        .save(&scope, StorageKey::CalendarEvents, &vec![sample_task()])
        .unwrap();

    let raw = store
        .get_raw(&StorageKey::CalendarEvents.for_user(&scope))
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["desc"], "bring mat");
    assert_eq!(json[0]["isAllDay"], false);
    assert_eq!(json[0]["load"], "light");
    assert_eq!(json[0]["date"], "2026-01-05");
}

#[test]
fn corrupt_payload_loads_as_missing() {
    let store = SqliteStore::open_in_memory().unwrap();
    let scope = UserScope::guest();
    let key = StorageKey::FinanceTransactions.for_user(&scope);
    store.put_raw(&key, scope.as_str(), "{not json").unwrap();

    let loaded: Option<Vec<avecma_core::Transaction>> = store
        .load(&scope, StorageKey::FinanceTransactions)
        .unwrap();
    assert!(loaded.is_none());

    let fallback: Vec<avecma_core::Transaction> = store
        .load_or_default(&scope, StorageKey::FinanceTransactions)
        .unwrap();
    assert!(fallback.is_empty());
}

#[test]
fn legacy_tasks_with_unknown_load_still_load() {
    let store = SqliteStore::open_in_memory().unwrap();
    let scope = UserScope::guest();
    let raw = r#"[{"id":1,"title":"Old","desc":"","date":"2026-01-02","time":"All Day","load":"extreme","isAllDay":true,"completed":false}]"#;
    store
        .put_raw(
            &StorageKey::CalendarEvents.for_user(&scope),
            scope.as_str(),
            raw,
        )
        .unwrap();

    let tasks: Vec<Task> = store
        .load_or_default(&scope, StorageKey::CalendarEvents)
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].load, None);
    assert_eq!(tasks[0].weight(), 3);
}

#[test]
fn keys_are_scoped_per_user() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mama = UserScope::new(Some("mama@example.com"));
    let papa = UserScope::new(Some("papa@example.com"));
    store.save(&mama, StorageKey::PastChats, &Vec::<u8>::new()).unwrap();
    store.save(&papa, StorageKey::Moods, &Vec::<u8>::new()).unwrap();

    assert_eq!(
        store.keys_for_scope(mama.as_str()).unwrap(),
        vec!["past_chats_mama@example.com".to_string()]
    );
    assert!(store.remove(&papa, StorageKey::Moods).unwrap());
    assert!(!store.remove(&papa, StorageKey::Moods).unwrap());
}
