//! Origin-scoped key-value storage.
//!
//! `KeyValueStore` is the narrow get/set/remove contract the history log and
//! settings store persist through. `LocalStorage` keeps values in the
//! `local_storage` SQLite table, partitioned by origin; `MemoryStorage` keeps
//! them in a shared map.

use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::connection::Database;
use crate::types::errors::StorageError;

/// Synchronous, string-keyed persistent storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// SQLite-backed store scoped to a single origin.
///
/// Cloning is cheap; clones share the same database and origin.
#[derive(Clone)]
pub struct LocalStorage {
    db: Arc<Database>,
    origin: String,
}

impl LocalStorage {
    pub fn new(db: Arc<Database>, origin: &str) -> Self {
        Self {
            db,
            origin: origin.to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Keys stored under this origin, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.db.connection();
        let mut stmt =
            conn.prepare("SELECT key FROM local_storage WHERE origin = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![self.origin], |row| row.get(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM local_storage WHERE origin = ?1 AND key = ?2",
                params![self.origin, key],
                |row| row.get(0),
            )
            .optional()?;
        log::debug!("storage get {}:{} -> {}", self.origin, key, value.is_some());
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = chrono::Utc::now().timestamp();
        self.db.connection().execute(
            "INSERT INTO local_storage (origin, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(origin, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.origin, key, value, now],
        )?;
        log::debug!("storage set {}:{} ({} bytes)", self.origin, key, value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.db.connection().execute(
            "DELETE FROM local_storage WHERE origin = ?1 AND key = ?2",
            params![self.origin, key],
        )?;
        log::debug!("storage remove {}:{}", self.origin, key);
        Ok(())
    }
}

/// In-process store. Clones share one map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
