//! Collection export service.
//!
//! Splits an app export into dreams and tags, resolves every dream's
//! references, and writes one row per dream.

use crate::io::formats::{CsvRowSink, RowEncoding, collection};
use crate::io::traits::RowSink;
use crate::models::{Document, DreamDocument, ExportedDream, FinalDream, TagDocument};
use crate::services::categorize::Categorizer;
use crate::{Error, Result};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Tag identifier the app's own exports are known to reference without
/// defining.
pub const KNOWN_MISSING_TAG: &str = "cc9e812a761cdcf17d267811896d65";

/// Options for collection export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Tag identifiers whose absence is expected.
    pub ignored_tag_ids: Vec<String>,
    /// Row encoding.
    pub encoding: RowEncoding,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            ignored_tag_ids: vec![KNOWN_MISSING_TAG.to_string()],
            encoding: RowEncoding::default(),
        }
    }
}

impl ExportOptions {
    /// Replaces the known-missing identifiers.
    #[must_use]
    pub fn with_ignored_tag_ids(mut self, ids: Vec<String>) -> Self {
        self.ignored_tag_ids = ids;
        self
    }

    /// Sets the row encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: RowEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    /// Rows written.
    pub dreams: usize,
    /// Tags indexed.
    pub tags: usize,
}

/// Service for flattening a collection into rows.
pub struct ExportService {
    options: ExportOptions,
}

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub const fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Partitions a raw collection into dreams and tags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] for the first entry that lacks the
    /// fields its kind requires.
    pub fn split(values: Vec<Value>) -> Result<(Vec<DreamDocument>, Vec<TagDocument>)> {
        let mut dreams = Vec::new();
        let mut tags = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            match Document::from_value(index, value)? {
                Document::Dream(dream) => dreams.push(dream),
                Document::Tag(tag) => tags.push(tag),
            }
        }
        debug!(dreams = dreams.len(), tags = tags.len(), "split collection");
        Ok((dreams, tags))
    }

    /// Resolves every dream in a raw collection, in collection order.
    ///
    /// # Errors
    ///
    /// Returns an error if a document is invalid or a referenced tag has an
    /// unknown category.
    pub fn convert(&self, values: Vec<Value>) -> Result<Vec<FinalDream>> {
        self.resolve(values).map(|(rows, _)| rows)
    }

    fn resolve(&self, values: Vec<Value>) -> Result<(Vec<FinalDream>, ExportResult)> {
        let (dreams, tags) = Self::split(values)?;
        let result = ExportResult {
            dreams: dreams.len(),
            tags: tags.len(),
        };
        let categorizer =
            Categorizer::new(tags).with_ignored(self.options.ignored_tag_ids.iter().cloned());

        let rows = dreams
            .iter()
            .map(|doc| categorizer.categorize(&ExportedDream::from(doc)))
            .collect::<Result<Vec<_>>>()?;
        Ok((rows, result))
    }

    /// Reads a collection file and writes its rows to `output`, or to
    /// standard output when `output` is `None`.
    ///
    /// `output` is only created once every dream has resolved, so a failed
    /// export leaves an existing file as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, conversion or writing fails.
    #[instrument(skip_all, fields(input = %input.display()))]
    pub fn export_file(&self, input: &Path, output: Option<&Path>) -> Result<ExportResult> {
        let values = collection::read_collection_file(input)?;
        let (rows, result) = self.resolve(values)?;
        match output {
            Some(path) => {
                let file = std::fs::File::create(path).map_err(|e| {
                    Error::operation("create_rows_file", format!("{}: {e}", path.display()))
                })?;
                self.write_rows(std::io::BufWriter::new(file), &rows)?;
            },
            None => self.write_rows(std::io::stdout().lock(), &rows)?,
        }

        info!(dreams = result.dreams, tags = result.tags, "exported rows");
        Ok(result)
    }

    /// Writes rows for a raw collection to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if conversion or writing fails.
    pub fn export_to_writer<W: Write + 'static>(
        &self,
        writer: W,
        values: Vec<Value>,
    ) -> Result<ExportResult> {
        let (rows, result) = self.resolve(values)?;
        self.write_rows(writer, &rows)?;
        info!(dreams = result.dreams, tags = result.tags, "exported rows");
        Ok(result)
    }

    /// Writes rows for a raw collection to a sink, then finalizes it.
    ///
    /// Every dream is resolved before the first row is written, so a failed
    /// export leaves the sink untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if conversion or writing fails.
    pub fn export_to_sink(
        &self,
        sink: Box<dyn RowSink>,
        values: Vec<Value>,
    ) -> Result<ExportResult> {
        let (rows, result) = self.resolve(values)?;
        write_all(sink, &rows)?;
        info!(dreams = result.dreams, tags = result.tags, "exported rows");
        Ok(result)
    }

    fn write_rows<W: Write + 'static>(&self, writer: W, rows: &[FinalDream]) -> Result<()> {
        write_all(
            Box::new(CsvRowSink::new(writer, self.options.encoding)),
            rows,
        )
    }
}

fn write_all(mut sink: Box<dyn RowSink>, rows: &[FinalDream]) -> Result<()> {
    for row in rows {
        sink.write(row)?;
    }
    sink.finalize()
}
