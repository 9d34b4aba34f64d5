use gridboard_core::{
    default_widgets, GridPosition, KeyValueStore, LayoutConfig, LayoutStore, ManualClock,
    MemoryKeyValueStore, StorageInfo, Widget, GRID_CELLS, LAYOUT_STORAGE_KEY,
};
use std::rc::Rc;
use std::time::Duration;

const START_MS: i64 = 1_700_000_000_000;

type TestStore = LayoutStore<Rc<MemoryKeyValueStore>, ManualClock>;

fn fixture() -> (Rc<MemoryKeyValueStore>, ManualClock, TestStore) {
    fixture_with(MemoryKeyValueStore::new())
}

fn fixture_with(backend: MemoryKeyValueStore) -> (Rc<MemoryKeyValueStore>, ManualClock, TestStore) {
    let backend = Rc::new(backend);
    let clock = ManualClock::starting_at(START_MS);
    let store = LayoutStore::new(Rc::clone(&backend), clock.clone(), LayoutConfig::default());
    (backend, clock, store)
}

/// Defaults with every widget shifted `step` cells along the index table.
fn rotated(step: usize) -> Vec<Widget> {
    default_widgets()
        .into_iter()
        .enumerate()
        .map(|(index, widget)| widget.moved_to(GRID_CELLS[(index + step) % GRID_CELLS.len()]))
        .collect()
}

fn stored_record(version: &str, user_id: &str) -> String {
    serde_json::json!({
        "userId": user_id,
        "widgets": rotated(1),
        "lastUpdated": START_MS,
        "version": version
    })
    .to_string()
}

#[test]
fn save_then_load_returns_equal_widgets() {
    let (_, _, store) = fixture();
    let widgets = rotated(2);

    assert!(store.save_layout("u1", &widgets));
    assert_eq!(store.get_layout("u1"), widgets);
}

#[test]
fn load_for_other_user_returns_defaults() {
    let (_, _, store) = fixture();
    assert!(store.save_layout("u1", &rotated(1)));

    assert_eq!(store.get_layout("u2"), default_widgets());
}

#[test]
fn second_user_save_replaces_first_users_record() {
    let (_, _, store) = fixture();
    assert!(store.save_layout("u1", &rotated(1)));
    assert!(store.save_layout("u2", &rotated(2)));

    assert_eq!(store.get_layout("u1"), default_widgets());
    assert_eq!(store.get_layout("u2"), rotated(2));
}

#[test]
fn stale_version_record_is_ignored() {
    let (backend, _, store) = fixture();
    backend
        .set(LAYOUT_STORAGE_KEY, &stored_record("0.9.0", "u1"))
        .unwrap();

    assert_eq!(store.get_layout("u1"), default_widgets());
}

#[test]
fn matching_version_record_written_externally_is_loaded() {
    let (backend, _, store) = fixture();
    backend
        .set(LAYOUT_STORAGE_KEY, &stored_record("1.0.0", "u1"))
        .unwrap();

    assert_eq!(store.get_layout("u1"), rotated(1));
    assert_eq!(store.get_last_updated("u1"), Some(START_MS));
}

#[test]
fn malformed_records_fall_back_to_defaults() {
    let (backend, _, store) = fixture();
    let bad_type = serde_json::json!({
        "userId": "u1",
        "widgets": [{
            "id": "clock-1",
            "type": "clock",
            "title": "Clock",
            "position": { "row": 0, "col": 0 },
            "size": { "width": 1, "height": 1 }
        }],
        "lastUpdated": START_MS,
        "version": "1.0.0"
    })
    .to_string();

    for raw in ["not json", "[]", "{\"userId\":\"u1\"}", bad_type.as_str()] {
        backend.set(LAYOUT_STORAGE_KEY, raw).unwrap();
        assert_eq!(store.get_layout("u1"), default_widgets(), "raw={raw}");
        assert_eq!(store.get_last_updated("u1"), None, "raw={raw}");
    }
}

#[test]
fn fractional_widget_sizes_are_kept() {
    let (backend, _, store) = fixture();
    let mut record = serde_json::json!({
        "userId": "u1",
        "widgets": rotated(1),
        "lastUpdated": START_MS,
        "version": "1.0.0"
    });
    record["widgets"][0]["size"]["width"] = serde_json::json!(1.5);
    backend
        .set(LAYOUT_STORAGE_KEY, &record.to_string())
        .unwrap();

    let loaded = store.get_layout("u1");
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded[0].size.width, 1.5);
    assert_eq!(loaded[0].position, rotated(1)[0].position);
    assert_eq!(store.get_last_updated("u1"), Some(START_MS));
}

#[test]
fn get_layout_returns_independent_copies() {
    let (_, _, store) = fixture();
    let mut first = store.get_layout("u1");
    first[0].title = "Changed".to_string();

    assert_eq!(store.get_layout("u1")[0].title, "Weather");
}

#[test]
fn rapid_updates_collapse_into_one_write_with_last_state() {
    let (backend, clock, mut store) = fixture();
    store.set_current_user("u1");

    for step in 1..=5 {
        store.update_widgets(rotated(step));
        clock.advance(Duration::from_millis(200));
        assert_eq!(store.tick(), None);
    }
    assert_eq!(backend.writes_to(LAYOUT_STORAGE_KEY), 0);

    clock.advance(Duration::from_millis(799));
    assert_eq!(store.tick(), None);
    clock.advance(Duration::from_millis(1));
    assert_eq!(store.tick(), Some(true));
    assert_eq!(store.tick(), None);

    assert_eq!(backend.writes_to(LAYOUT_STORAGE_KEY), 1);
    assert_eq!(store.get_layout("u1"), rotated(5));
    assert_eq!(store.get_last_updated("u1"), Some(START_MS + 1_800));
}

#[test]
fn update_repairs_conflicting_positions() {
    let (_, _, mut store) = fixture();
    let mut widgets = default_widgets();
    widgets[2].position = GridPosition::new(0, 0);
    widgets[3].position = GridPosition::new(3, 3);

    store.update_widgets(widgets);

    let positions: Vec<_> = store.widgets().iter().map(|w| w.position).collect();
    assert_eq!(
        positions,
        vec![
            GridPosition::new(0, 0),
            GridPosition::new(0, 1),
            GridPosition::new(1, 0),
            GridPosition::new(1, 1),
        ]
    );
}

#[test]
fn set_current_user_loads_their_layout_and_drops_pending_save() {
    let (backend, clock, mut store) = fixture();
    assert!(store.save_layout("u1", &rotated(3)));

    store.set_current_user("u2");
    store.update_widgets(rotated(1));
    assert!(store.has_pending_save());

    store.set_current_user("u1");
    assert!(!store.has_pending_save());
    assert_eq!(store.current_user(), Some("u1"));
    assert_eq!(store.widgets(), rotated(3).as_slice());

    clock.advance(Duration::from_secs(2));
    assert_eq!(store.tick(), None);
    assert_eq!(backend.writes_to(LAYOUT_STORAGE_KEY), 1);
}

#[test]
fn reselecting_current_user_keeps_unsaved_edits() {
    let (backend, clock, mut store) = fixture();
    store.set_current_user("u1");
    store.update_widgets(rotated(1));

    store.set_current_user("u1");
    assert!(store.has_pending_save());
    assert_eq!(store.widgets(), rotated(1).as_slice());

    clock.advance(Duration::from_secs(2));
    assert_eq!(store.tick(), Some(true));
    assert_eq!(backend.writes_to(LAYOUT_STORAGE_KEY), 1);
    assert_eq!(store.get_layout("u1"), rotated(1));
}

#[test]
fn clear_current_user_resets_memory_and_skips_scheduling() {
    let (_, _, mut store) = fixture();
    store.set_current_user("u1");
    store.update_widgets(rotated(1));

    store.clear_current_user();
    assert_eq!(store.current_user(), None);
    assert!(!store.has_pending_save());
    assert_eq!(store.widgets(), default_widgets().as_slice());

    store.update_widgets(rotated(2));
    assert!(!store.has_pending_save());
}

#[test]
fn clear_all_removes_record_and_pending_save() {
    let (backend, clock, mut store) = fixture();
    store.set_current_user("u1");
    assert!(store.save_layout("u1", &rotated(1)));
    store.update_widgets(rotated(2));

    store.clear_all();

    assert_eq!(store.get_layout("u1"), default_widgets());
    assert_eq!(store.get_last_updated("u1"), None);
    assert_eq!(store.widgets(), default_widgets().as_slice());
    clock.advance(Duration::from_secs(5));
    assert_eq!(store.tick(), None);
    assert_eq!(backend.get(LAYOUT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn reset_layout_overwrites_storage_with_defaults() {
    let (_, _, mut store) = fixture();
    store.set_current_user("u1");
    assert!(store.save_layout("u1", &rotated(2)));
    store.update_widgets(rotated(3));

    let reset = store.reset_layout("u1");

    assert_eq!(reset, default_widgets());
    assert_eq!(store.get_layout("u1"), default_widgets());
    assert_eq!(store.widgets(), default_widgets().as_slice());
    assert!(!store.has_pending_save());
    assert!(store.get_last_updated("u1").is_some());
}

#[test]
fn last_updated_tracks_owner_and_ignores_version() {
    let (backend, clock, store) = fixture();
    clock.advance(Duration::from_millis(42));
    assert!(store.save_layout("u1", &default_widgets()));

    assert_eq!(store.get_last_updated("u1"), Some(START_MS + 42));
    assert_eq!(store.get_last_updated("u2"), None);

    backend
        .set(LAYOUT_STORAGE_KEY, &stored_record("0.9.0", "u1"))
        .unwrap();
    assert_eq!(store.get_last_updated("u1"), Some(START_MS));
}

#[test]
fn storage_info_reports_record_size() {
    let (backend, _, store) = fixture();
    assert_eq!(
        store.get_storage_info(),
        StorageInfo {
            used_bytes: 0,
            available: true
        }
    );

    assert!(store.save_layout("u1", &default_widgets()));
    let stored = backend.get(LAYOUT_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(store.get_storage_info().used_bytes, stored.len());
}

#[test]
fn disabled_storage_degrades_to_memory_only() {
    let backend = MemoryKeyValueStore::new();
    backend.set_disabled(true);
    let (backend, clock, mut store) = fixture_with(backend);

    store.set_current_user("u1");
    assert_eq!(store.widgets(), default_widgets().as_slice());
    assert!(!store.save_layout("u1", &rotated(1)));
    assert_eq!(
        store.get_storage_info(),
        StorageInfo {
            used_bytes: 0,
            available: false
        }
    );

    store.update_widgets(rotated(1));
    assert_eq!(store.widgets(), rotated(1).as_slice());
    clock.advance(Duration::from_secs(1));
    assert_eq!(store.tick(), Some(false));
    assert_eq!(store.get_last_updated("u1"), None);

    backend.set_disabled(false);
    assert!(backend.is_empty());
}

#[test]
fn quota_exceeded_save_returns_false_but_store_stays_available() {
    let (_, _, store) = fixture_with(MemoryKeyValueStore::with_quota(64));

    assert!(!store.save_layout("u1", &default_widgets()));
    assert!(store.get_storage_info().available);
    assert_eq!(store.get_layout("u1"), default_widgets());
}

#[test]
fn flush_persists_pending_state_immediately() {
    let (backend, _, mut store) = fixture();
    store.set_current_user("u1");
    store.update_widgets(rotated(2));

    assert_eq!(store.flush_pending_save(), Some(true));
    assert_eq!(backend.writes_to(LAYOUT_STORAGE_KEY), 1);
    assert_eq!(store.get_layout("u1"), rotated(2));
    assert!(!store.has_pending_save());
}
