use chrono::NaiveDate;
use glassday_core::db::migrations::latest_version;
use glassday_core::db::{open_db, DbError};
use glassday_core::{
    DayRepository, DayStateMachine, Energy, FixedClock, ItemStore, KvDayRepository, KvStore,
    RandomLayout, SequentialIdGenerator, SqliteKvStore, Stage, StoreError, INTRO_SEEN_KEY,
};
use rusqlite::Connection;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn in_memory_store_applies_migrations() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    assert_eq!(schema_version(store.connection()), latest_version());

    let exists: i64 = store
        .connection()
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("glassday.sqlite3");

    let mut store = SqliteKvStore::open(&path).unwrap();
    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    store.set("gone", "x").unwrap();
    store.remove("gone").unwrap();
    store.remove("never-existed").unwrap();
    drop(store);

    let reopened = SqliteKvStore::open(&path).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("two"));
    assert!(reopened.get("gone").unwrap().is_none());
    assert_eq!(schema_version(reopened.connection()), latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        SqliteKvStore::open(&path),
        Err(StoreError::Db(DbError::UnsupportedSchemaVersion { .. }))
    ));
}

#[test]
fn locked_day_resumes_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glassday.sqlite3");
    let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    let new_store = || {
        ItemStore::new(
            Box::new(SequentialIdGenerator::new()),
            Box::new(RandomLayout::seeded(5)),
        )
    };

    let repo = KvDayRepository::new(SqliteKvStore::open(&path).unwrap());
    let mut machine = DayStateMachine::start(repo, clock, new_store());
    let id = machine.add_item("Finish report").unwrap();
    machine.finish_dump().unwrap();
    machine.toggle_type(&id);
    machine.finish_selection().unwrap();
    machine.dismiss_explanation().unwrap();
    machine.set_energy(Energy::Medium);
    machine.set_action(&id, "Outline section one");
    machine.lock().unwrap();
    machine.toggle_handled(&id);
    let items = machine.items();
    drop(machine);

    let repo = KvDayRepository::new(SqliteKvStore::open(&path).unwrap());
    assert!(repo.intro_seen());
    assert_eq!(repo.store().get(INTRO_SEEN_KEY).unwrap().as_deref(), Some("true"));
    assert_eq!(repo.load_recents(), vec!["Finish report"]);

    let resumed = DayStateMachine::start(repo, clock, new_store());
    assert_eq!(resumed.stage(), Stage::Locked);
    assert_eq!(&*resumed.items(), &*items);
    assert!(resumed.items()[0].handled);
}
