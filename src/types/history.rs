use serde::{Deserialize, Serialize};
use std::fmt;

/// A single logged generate or scan action.
///
/// Field names match the persisted JSON records (`{"date", "entry"}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryEntry {
    pub date: String,
    pub entry: String,
}

impl HistoryEntry {
    /// Display row as shown in the history panel: `"<date> - <entry>"`.
    pub fn row(&self) -> String {
        format!("{} - {}", self.date, self.entry)
    }
}

/// The kinds of action that produce a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLabel {
    Generated(String),
    Scanned(String),
    ScannedUpload(String),
}

impl fmt::Display for HistoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryLabel::Generated(text) => write!(f, "Generated: {}", text),
            HistoryLabel::Scanned(text) => write!(f, "Scanned: {}", text),
            HistoryLabel::ScannedUpload(text) => write!(f, "Scanned (upload): {}", text),
        }
    }
}
