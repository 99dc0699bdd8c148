//! Dream records at each stage of the pipeline.

use super::document::{DocumentId, DreamDocument};
use serde::{Deserialize, Serialize};

/// Lucidity assigned to dreams that only carry the legacy `isLucid` flag.
pub const LEGACY_LUCID_SCORE: u32 = 5;

/// A dream as read from the delimited journal export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Dream title.
    pub title: String,
    /// Dream body.
    pub description: String,
    /// Label names, in export order.
    pub labels: Vec<String>,
    /// Epoch timestamp in milliseconds.
    pub date_millis: i64,
}

impl JournalEntry {
    /// Returns whether any label equals `name`, ignoring ASCII case.
    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(name))
    }
}

/// A dream read back from the app's export, ready for categorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDream {
    /// Dream title.
    pub title: String,
    /// Dream body.
    pub description: String,
    /// Tag, character, place and emotion references, merged in that order.
    pub labels: Vec<DocumentId>,
    /// Lucidity score, 0-10.
    pub lucidity: u32,
    /// Nightmare flag.
    pub nightmare: bool,
    /// Date as a `YYYYMMDD` integer.
    pub date: i64,
}

impl From<&DreamDocument> for ExportedDream {
    fn from(doc: &DreamDocument) -> Self {
        let lucidity = if doc.lucidity == 0 && doc.is_lucid {
            LEGACY_LUCID_SCORE
        } else {
            doc.lucidity
        };

        Self {
            title: doc.title.clone(),
            description: doc.description.clone(),
            labels: doc.references().cloned().collect(),
            lucidity,
            nightmare: doc.is_nightmare,
            date: doc.date,
        }
    }
}

/// A fully resolved, denormalized dream: one output row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalDream {
    /// Dream title.
    pub title: String,
    /// Dream body.
    pub description: String,
    /// Date as a `YYYYMMDD` integer.
    pub date: i64,
    /// Lucidity score, 0-100.
    pub lucidity: u32,
    /// Nightmare flag.
    pub nightmare: bool,
    /// Plain tag titles.
    pub tags: Vec<String>,
    /// Character titles.
    pub people: Vec<String>,
    /// Emotion titles.
    pub feelings: Vec<String>,
    /// Place titles.
    pub places: Vec<String>,
}
