use gridboard_core::storage::schema::KV_SCHEMA_VERSION;
use gridboard_core::{
    default_widgets, GridPosition, KeyValueStore, LayoutConfig, LayoutStore, ManualClock,
    SqliteKeyValueStore, StorageError, LAYOUT_STORAGE_KEY,
};
use rusqlite::Connection;

#[test]
fn in_memory_store_is_stamped_with_current_schema() {
    let store = SqliteKeyValueStore::open_in_memory().unwrap();

    assert_eq!(store.schema_version().unwrap(), KV_SCHEMA_VERSION);
}

#[test]
fn reopening_store_file_keeps_schema_and_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridboard.db");

    let first = SqliteKeyValueStore::open(&path).unwrap();
    first.set("theme-mode", "dark").unwrap();
    drop(first);

    let second = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(second.schema_version().unwrap(), KV_SCHEMA_VERSION);
    assert_eq!(second.get("theme-mode").unwrap().as_deref(), Some("dark"));
    drop(second);

    let conn = Connection::open(&path).unwrap();
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn store_file_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = SqliteKeyValueStore::open(&path).err().unwrap();
    match err {
        StorageError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, KV_SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn set_overwrites_and_remove_deletes() {
    let store = SqliteKeyValueStore::open_in_memory().unwrap();

    assert_eq!(store.get("theme-mode").unwrap(), None);
    store.set("theme-mode", "light").unwrap();
    store.set("theme-mode", "dark").unwrap();
    assert_eq!(store.get("theme-mode").unwrap().as_deref(), Some("dark"));

    store.remove("theme-mode").unwrap();
    store.remove("theme-mode").unwrap();
    assert_eq!(store.get("theme-mode").unwrap(), None);
    assert!(store.probe_available());
}

#[test]
fn layout_survives_reopening_the_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.db");
    let mut widgets = default_widgets();
    widgets[0].position = GridPosition::new(1, 1);
    widgets[3].position = GridPosition::new(0, 0);

    {
        let layout = LayoutStore::new(
            SqliteKeyValueStore::open(&path).unwrap(),
            ManualClock::starting_at(1_000),
            LayoutConfig::default(),
        );
        assert!(layout.save_layout("u1", &widgets));
    }

    let reopened = SqliteKeyValueStore::open(&path).unwrap();
    assert!(reopened.get(LAYOUT_STORAGE_KEY).unwrap().is_some());
    let mut layout = LayoutStore::new(
        reopened,
        ManualClock::starting_at(2_000),
        LayoutConfig::default(),
    );
    layout.set_current_user("u1");
    assert_eq!(layout.widgets(), widgets.as_slice());
    assert_eq!(layout.get_last_updated("u1"), Some(1_000));
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
