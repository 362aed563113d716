//! Unit tests for the QRDesk database layer (connection, migrations, local storage).

use std::sync::Arc;

use qrdesk::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use qrdesk::database::{Database, KeyValueStore, LocalStorage};
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    assert!(Database::open_in_memory().is_ok());
}

#[test]
fn test_migrations_create_local_storage_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='local_storage'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "local_storage should exist after migrations");
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    run_all(db.connection()).expect("second run should succeed");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("qrdesk.db");

    {
        let db = Arc::new(Database::open(&path).unwrap());
        let mut store = LocalStorage::new(db, "qrdesk://local");
        store.set("defaultFG", "#000000").unwrap();
    }

    let db = Arc::new(Database::open(&path).unwrap());
    let store = LocalStorage::new(db, "qrdesk://local");
    assert_eq!(store.get("defaultFG").unwrap().as_deref(), Some("#000000"));
}
