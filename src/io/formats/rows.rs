//! Flat row adapter for export.
//!
//! Each dream becomes one headerless CSV record of nine fields:
//!
//! | # | Field | Encoding |
//! |---|-------|----------|
//! | 1 | title | base64 |
//! | 2 | description | base64 |
//! | 3 | date (`YYYYMMDD`) | decimal |
//! | 4 | lucidity (0-100) | decimal |
//! | 5 | nightmare | `0` / `1` |
//! | 6 | tags | `|`-joined, base64 |
//! | 7 | people | `|`-joined, base64 |
//! | 8 | feelings | `|`-joined, base64 |
//! | 9 | places | `|`-joined, base64 |
//!
//! With [`RowEncoding::encode_numeric_fields`] the decimal fields are base64
//! encoded too. Base64 output never contains commas, quotes or newlines, so
//! rows need no escaping.

use crate::io::traits::{RowSink, RowSource};
use crate::models::FinalDream;
use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::{Read, Write};

/// Separator joining the titles inside one bucket field.
pub const BUCKET_SEPARATOR: &str = "|";

/// Number of fields in a row.
pub const ROW_FIELDS: usize = 9;

/// Controls how scalar fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowEncoding {
    /// Base64-encode date, lucidity and nightmare as well.
    pub encode_numeric_fields: bool,
}

impl RowEncoding {
    fn scalar(self, value: &str) -> String {
        if self.encode_numeric_fields {
            encode(value)
        } else {
            value.to_string()
        }
    }

    fn decode_scalar(self, field: &str) -> Result<String> {
        if self.encode_numeric_fields {
            decode(field)
        } else {
            Ok(field.to_string())
        }
    }
}

/// Base64-encodes a string's UTF-8 bytes.
#[must_use]
pub fn encode(s: &str) -> String {
    STANDARD.encode(s.as_bytes())
}

/// Decodes a base64 field back into text.
///
/// # Errors
///
/// Returns an error if the field is not base64 or not UTF-8.
pub fn decode(field: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(field.trim())
        .map_err(|e| Error::InvalidInput(format!("invalid base64 field: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("base64 field is not UTF-8: {e}")))
}

/// Renders a dream as its nine row fields.
#[must_use]
pub fn to_record(dream: &FinalDream, encoding: RowEncoding) -> [String; ROW_FIELDS] {
    [
        encode(&dream.title),
        encode(&dream.description),
        encoding.scalar(&dream.date.to_string()),
        encoding.scalar(&dream.lucidity.to_string()),
        encoding.scalar(if dream.nightmare { "1" } else { "0" }),
        encode(&dream.tags.join(BUCKET_SEPARATOR)),
        encode(&dream.people.join(BUCKET_SEPARATOR)),
        encode(&dream.feelings.join(BUCKET_SEPARATOR)),
        encode(&dream.places.join(BUCKET_SEPARATOR)),
    ]
}

fn split_bucket(joined: &str) -> Vec<String> {
    joined
        .split(BUCKET_SEPARATOR)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Parses nine row fields back into a dream.
///
/// # Errors
///
/// Returns an error if the field count is wrong or a field does not decode.
pub fn from_record(record: &csv::StringRecord, encoding: RowEncoding) -> Result<FinalDream> {
    if record.len() != ROW_FIELDS {
        return Err(Error::InvalidInput(format!(
            "expected {ROW_FIELDS} fields, found {}",
            record.len()
        )));
    }
    let field = |i: usize| record.get(i).unwrap_or_default();

    let date = encoding.decode_scalar(field(2))?;
    let lucidity = encoding.decode_scalar(field(3))?;
    let nightmare = encoding.decode_scalar(field(4))?;

    Ok(FinalDream {
        title: decode(field(0))?,
        description: decode(field(1))?,
        date: date
            .parse()
            .map_err(|e| Error::InvalidInput(format!("date '{date}': {e}")))?,
        lucidity: lucidity
            .parse()
            .map_err(|e| Error::InvalidInput(format!("lucidity '{lucidity}': {e}")))?,
        nightmare: match nightmare.as_str() {
            "1" => true,
            "0" => false,
            other => {
                return Err(Error::InvalidInput(format!(
                    "nightmare '{other}': expected 0 or 1"
                )));
            },
        },
        tags: split_bucket(&decode(field(5))?),
        people: split_bucket(&decode(field(6))?),
        feelings: split_bucket(&decode(field(7))?),
        places: split_bucket(&decode(field(8))?),
    })
}

/// Row export sink.
pub struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
    encoding: RowEncoding,
    /// Rows written so far.
    count: usize,
}

impl<W: Write> CsvRowSink<W> {
    /// Creates a new row sink.
    pub fn new(writer: W, encoding: RowEncoding) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        Self {
            writer,
            encoding,
            count: 0,
        }
    }

    /// Returns the number of rows written.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

impl<W: Write> RowSink for CsvRowSink<W> {
    fn write(&mut self, dream: &FinalDream) -> Result<()> {
        self.writer
            .write_record(to_record(dream, self.encoding))
            .map_err(|e| Error::operation("write_row", e))?;
        self.count += 1;
        Ok(())
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::operation("flush_rows", e))
    }
}

/// Row import source, used to inspect an export.
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    encoding: RowEncoding,
    /// Line number for error reporting.
    line_number: usize,
}

impl<R: Read> CsvRowSource<R> {
    /// Creates a new row source.
    pub fn new(reader: R, encoding: RowEncoding) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            encoding,
            line_number: 0,
        }
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next(&mut self) -> Result<Option<FinalDream>> {
        let mut record = csv::StringRecord::new();
        let has_record = self
            .reader
            .read_record(&mut record)
            .map_err(|e| Error::operation("read_row", e))?;
        if !has_record {
            return Ok(None);
        }
        self.line_number += 1;

        from_record(&record, self.encoding)
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("Line {}: {e}", self.line_number)))
    }
}
