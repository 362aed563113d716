//! History Log for QRDesk.
//!
//! Implements `HistoryLogTrait`: appending, loading, and clearing the list
//! of generate/scan actions. The list is persisted as a JSON array under
//! [`HISTORY_KEY`] and mirrored by an in-memory rendered list. After every
//! completed operation the two hold the same entries in the same order.

use chrono::Local;
use serde_json::Value;

use crate::database::KeyValueStore;
use crate::types::errors::HistoryError;
use crate::types::history::HistoryEntry;

/// Storage key holding the JSON-encoded history list.
pub const HISTORY_KEY: &str = "qrHistory";

/// Trait defining history log operations.
pub trait HistoryLogTrait {
    fn append(&mut self, label: &str) -> Result<HistoryEntry, HistoryError>;
    fn load_all(&mut self) -> Vec<HistoryEntry>;
    fn clear(&mut self) -> Result<(), HistoryError>;
    fn entries(&self) -> &[HistoryEntry];
    fn rows(&self) -> Vec<String>;
}

/// Newest-first history log over any key-value store.
pub struct HistoryLog<S: KeyValueStore> {
    store: S,
    rendered: Vec<HistoryEntry>,
}

impl<S: KeyValueStore> HistoryLog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rendered: Vec::new(),
        }
    }

    /// Local time in the `M/D/YYYY, h:mm:ss AM` form.
    fn timestamp() -> String {
        Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }

    /// Reads the stored records as raw JSON. Absent, `null`, non-JSON or
    /// non-array data reads as empty.
    fn read_records(&self) -> Vec<Value> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("history read failed, treating as empty: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(Value::Null) => Vec::new(),
            Ok(other) => {
                log::warn!("stored history is not a list, treating as empty: {}", other);
                Vec::new()
            }
            Err(e) => {
                log::warn!("stored history is malformed, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Every stored record renders, even one with missing or odd fields.
    fn read_persisted(&self) -> Vec<HistoryEntry> {
        self.read_records().iter().map(entry_from_record).collect()
    }
}

fn field_text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn entry_from_record(record: &Value) -> HistoryEntry {
    match serde_json::from_value::<HistoryEntry>(record.clone()) {
        Ok(entry) => entry,
        Err(e) => {
            log::warn!("stored history record is malformed: {}", e);
            HistoryEntry {
                date: field_text(record, "date"),
                entry: field_text(record, "entry"),
            }
        }
    }
}

impl<S: KeyValueStore> HistoryLogTrait for HistoryLog<S> {
    /// Stamps a new entry, writes it to the front of the stored list, then
    /// shows it at the top of the rendered list.
    ///
    /// If the write fails neither list changes.
    fn append(&mut self, label: &str) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            date: Self::timestamp(),
            entry: label.to_string(),
        };

        // Read-modify-write; callers are single-threaded. Stored records are
        // written back as they were read.
        let mut records = self.read_records();
        let record =
            serde_json::to_value(&entry).map_err(|e| HistoryError::Storage(e.to_string()))?;
        records.insert(0, record);
        let json = serde_json::to_string(&records)
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        self.store.set(HISTORY_KEY, &json)?;

        self.rendered.insert(0, entry.clone());
        log::info!("history: {}", entry.entry);
        Ok(entry)
    }

    /// Replaces the rendered list with the stored one, in stored order.
    fn load_all(&mut self) -> Vec<HistoryEntry> {
        self.rendered = self.read_persisted();
        log::debug!("loaded {} history entries", self.rendered.len());
        self.rendered.clone()
    }

    /// Drops the stored list and empties the rendered list.
    fn clear(&mut self) -> Result<(), HistoryError> {
        self.store.remove(HISTORY_KEY)?;
        self.rendered.clear();
        log::info!("history cleared");
        Ok(())
    }

    fn entries(&self) -> &[HistoryEntry] {
        &self.rendered
    }

    fn rows(&self) -> Vec<String> {
        self.rendered.iter().map(HistoryEntry::row).collect()
    }
}
