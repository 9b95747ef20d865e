//! Unit tests for the session storage backends.

use scroll_restore::storage::{
    MemoryStorage, SessionStorage, SqliteStorage, UnavailableStorage, SCROLL_HISTORY_KEY,
};
use tempfile::TempDir;

fn exercise(storage: &mut dyn SessionStorage) {
    assert_eq!(storage.get(SCROLL_HISTORY_KEY).unwrap(), None);

    storage.set(SCROLL_HISTORY_KEY, "first").unwrap();
    assert_eq!(storage.get(SCROLL_HISTORY_KEY).unwrap().as_deref(), Some("first"));

    storage.set(SCROLL_HISTORY_KEY, "second").unwrap();
    assert_eq!(storage.get(SCROLL_HISTORY_KEY).unwrap().as_deref(), Some("second"));

    storage.remove(SCROLL_HISTORY_KEY).unwrap();
    assert_eq!(storage.get(SCROLL_HISTORY_KEY).unwrap(), None);

    // Removing a missing key is not an error.
    storage.remove("missing").unwrap();
}

#[test]
fn test_memory_storage_contract() {
    let mut storage = MemoryStorage::new();
    exercise(&mut storage);
    assert!(storage.is_empty());
}

#[test]
fn test_sqlite_storage_contract() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    exercise(&mut storage);
}

#[test]
fn test_unavailable_storage_drops_writes() {
    let mut storage = UnavailableStorage;
    storage.set(SCROLL_HISTORY_KEY, "value").unwrap();
    assert_eq!(storage.get(SCROLL_HISTORY_KEY).unwrap(), None);
    storage.remove(SCROLL_HISTORY_KEY).unwrap();
}

/// A file-backed store keeps its value across connections.
#[test]
fn test_sqlite_storage_persists_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.db");

    {
        let mut storage = SqliteStorage::open(&path).unwrap();
        storage.set(SCROLL_HISTORY_KEY, r#"{"urls":[],"scrolly":[]}"#).unwrap();
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(
        storage.get(SCROLL_HISTORY_KEY).unwrap().as_deref(),
        Some(r#"{"urls":[],"scrolly":[]}"#)
    );
}

#[test]
fn test_sqlite_migrations_are_recorded_once() {
    use scroll_restore::storage::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};

    let storage = SqliteStorage::open_in_memory().unwrap();
    let conn = storage.connection();
    assert_eq!(get_schema_version(conn), CURRENT_SCHEMA_VERSION);

    run_all(conn).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}
