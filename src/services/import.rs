//! Journal import service.
//!
//! Turns a delimited journal export and its label list into a document
//! collection the target app can restore: one tag document per label, then
//! one dream document per journal entry, each cloned from a [`TemplateSet`].

use crate::io::formats::{JournalReader, collection, read_labels};
use crate::models::{Document, DocumentId, DreamDocument, JournalEntry, TagDocument};
use crate::services::ids::IdGenerator;
use crate::services::templates::TemplateSet;
use crate::{Error, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Label that marks a lucid dream.
pub const LUCID_LABEL: &str = "Lucid";
/// Label that marks a nightmare.
pub const NIGHTMARE_LABEL: &str = "Nightmare";
/// Label that marks a recurring dream.
pub const RECURRENT_LABEL: &str = "Recurrent";

/// Time zone used to turn entry timestamps into calendar dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateZone {
    /// The machine's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl DateZone {
    /// Parses a zone name.
    ///
    /// Returns `None` if the name is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "utc" | "z" => Some(Self::Utc),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

/// Options for journal import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Token separating fields and records in the journal export.
    pub delimiter: String,
    /// Zone used for `YYYYMMDD` dates.
    pub timezone: DateZone,
    /// Pretty-print the output collection.
    pub pretty: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: crate::io::formats::DEFAULT_DELIMITER.to_string(),
            timezone: DateZone::Local,
            pretty: false,
        }
    }
}

impl ImportOptions {
    /// Sets the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the date zone.
    #[must_use]
    pub const fn with_timezone(mut self, timezone: DateZone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Enables or disables pretty output.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Callback invoked with every generated document, tags first.
pub type ProgressCallback = Box<dyn Fn(&Document) + Send>;

/// Result of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Tag documents followed by dream documents.
    pub documents: Vec<Document>,
    /// Number of tag documents.
    pub tags: usize,
    /// Number of dream documents.
    pub dreams: usize,
    /// Labels used by entries that were missing from the label list.
    pub unresolved_labels: usize,
}

/// Converts an epoch-millisecond timestamp to a `YYYYMMDD` integer.
///
/// Returns `None` if the timestamp is out of range.
#[must_use]
pub fn journal_date(millis: i64, zone: DateZone) -> Option<i64> {
    let instant = DateTime::<Utc>::from_timestamp_millis(millis)?;
    let day: NaiveDate = match zone {
        DateZone::Utc => instant.date_naive(),
        DateZone::Local => instant.with_timezone(&Local).date_naive(),
    };
    Some(i64::from(day.year()) * 10_000 + i64::from(day.month()) * 100 + i64::from(day.day()))
}

/// Service that builds the import collection.
pub struct ImportService {
    templates: TemplateSet,
    options: ImportOptions,
}

impl ImportService {
    /// Creates a new import service.
    #[must_use]
    pub const fn new(templates: TemplateSet, options: ImportOptions) -> Self {
        Self { templates, options }
    }

    /// Creates a service using templates harvested from a sample collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or has no usable templates.
    pub fn from_sample_file(path: &Path, options: ImportOptions) -> Result<Self> {
        let values = collection::read_collection_file(path)?;
        let templates = TemplateSet::locate(&values)?;
        Ok(Self::new(templates, options))
    }

    /// Returns the templates in use.
    #[must_use]
    pub const fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Reads every entry of a delimited journal export.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or any record is malformed.
    pub fn read_entries(&self, path: &Path) -> Result<Vec<JournalEntry>> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::operation("open_journal", format!("{}: {e}", path.display())))?;
        JournalReader::with_delimiter(BufReader::new(file), &self.options.delimiter).collect()
    }

    /// Builds tag and dream documents.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry's timestamp cannot be turned into a date.
    pub fn convert(
        &self,
        entries: &[JournalEntry],
        labels: &[String],
        ids: &mut dyn IdGenerator,
        progress: Option<&ProgressCallback>,
    ) -> Result<ImportResult> {
        let mut result = ImportResult {
            documents: Vec::with_capacity(labels.len() + entries.len()),
            ..ImportResult::default()
        };
        let mut label_ids: HashMap<&str, DocumentId> = HashMap::with_capacity(labels.len());

        for label in labels {
            let tag = self.tag_document(label, ids);
            label_ids.insert(label.as_str(), tag.id.clone());
            emit(&mut result.documents, Document::Tag(tag), progress);
            result.tags += 1;
        }

        for (index, entry) in entries.iter().enumerate() {
            let dream = self
                .dream_document(entry, &label_ids, ids, &mut result)
                .map_err(|reason| Error::MalformedRecord {
                    record: index + 1,
                    reason,
                })?;
            emit(&mut result.documents, Document::Dream(dream), progress);
            result.dreams += 1;
        }

        info!(
            tags = result.tags,
            dreams = result.dreams,
            unresolved_labels = result.unresolved_labels,
            "built import collection"
        );
        Ok(result)
    }

    /// Reads the journal export and label list, converts them, and writes the
    /// collection to `output`.
    ///
    /// The output file is only created once every input parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, conversion or writing fails.
    #[instrument(skip_all, fields(entries = %entries.display()))]
    pub fn import_files(
        &self,
        entries: &Path,
        labels: &Path,
        output: &Path,
        ids: &mut dyn IdGenerator,
        progress: Option<&ProgressCallback>,
    ) -> Result<ImportResult> {
        let entries = self.read_entries(entries)?;
        let labels = std::fs::File::open(labels)
            .map_err(|e| Error::operation("open_labels", format!("{}: {e}", labels.display())))
            .and_then(|file| read_labels(BufReader::new(file)))?;
        debug!(entries = entries.len(), labels = labels.len(), "parsed inputs");

        let result = self.convert(&entries, &labels, ids, progress)?;
        collection::write_collection_file(output, &result.documents, self.options.pretty)?;
        info!(output = %output.display(), documents = result.documents.len(), "wrote collection");
        Ok(result)
    }

    fn tag_document(&self, label: &str, ids: &mut dyn IdGenerator) -> TagDocument {
        let mut tag = self.templates.tag.clone();
        tag.id = DocumentId::from(ids.next_id());
        tag.rev = Some(ids.next_id());
        tag.title = label.to_string();
        tag
    }

    fn dream_document(
        &self,
        entry: &JournalEntry,
        label_ids: &HashMap<&str, DocumentId>,
        ids: &mut dyn IdGenerator,
        result: &mut ImportResult,
    ) -> std::result::Result<DreamDocument, String> {
        let date = journal_date(entry.date_millis, self.options.timezone)
            .ok_or_else(|| format!("timestamp {} is out of range", entry.date_millis))?;

        let mut dream = self.templates.dream.clone();
        dream.title.clone_from(&entry.title);
        dream.description.clone_from(&entry.description);
        dream.tags = entry
            .labels
            .iter()
            .map(|label| {
                let id = label_ids.get(label.as_str()).cloned();
                if id.is_none() {
                    debug!(label = %label, title = %entry.title, "label missing from label list");
                    result.unresolved_labels += 1;
                }
                id
            })
            .collect();
        dream.is_lucid = entry.has_label(LUCID_LABEL);
        dream.is_nightmare = entry.has_label(NIGHTMARE_LABEL);
        dream.is_recurrent = entry.has_label(RECURRENT_LABEL);
        dream.rev = Some(ids.next_id());
        dream.id = DocumentId::from(ids.next_id());
        dream.date = date;
        dream.date_negative = Some(date);
        Ok(dream)
    }
}

fn emit(documents: &mut Vec<Document>, document: Document, progress: Option<&ProgressCallback>) {
    if let Some(cb) = progress {
        cb(&document);
    }
    documents.push(document);
}
