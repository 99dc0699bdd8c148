//! Delimited journal export reader.
//!
//! The journal app's database dump separates both fields and records with the
//! same multi-byte token, so the input is a flat token stream consumed four
//! tokens at a time: title, description, label list, date in milliseconds.
//! It can be produced from the app's sqlite database with:
//!
//! ```text
//! .separator 多 多
//! select title, dream_entry, labels, date from table_dreams
//!     inner join table_nights on table_dreams.night_id = table_nights._id;
//! ```

use crate::models::JournalEntry;
use crate::{Error, Result};
use std::io::BufRead;

/// Token separating fields and records in the journal export.
pub const DEFAULT_DELIMITER: &str = "多";

/// Number of tokens making up one record.
const FIELDS_PER_RECORD: usize = 4;

/// Strips one layer of `open` wrapping.
///
/// Only the leading character is checked; the last character is dropped
/// whatever it is. A lone `open` character becomes an empty string.
fn strip_layer(s: &str, open: char) -> &str {
    let Some(inner) = s.strip_prefix(open) else {
        return s;
    };
    let mut chars = inner.chars();
    chars.next_back();
    chars.as_str()
}

/// Unwraps a field exported as `"[a,b]"`-style text.
///
/// Trims a quote layer, then a bracket layer, then another quote layer, each
/// only if the string still starts with that character.
#[must_use]
pub fn clean(field: &str) -> &str {
    let s = strip_layer(field, '"');
    let s = strip_layer(s, '[');
    strip_layer(s, '"')
}

/// Cleans a label field and splits it into individually cleaned labels.
///
/// Trailing empty pieces are dropped, so `a,b,` yields two labels and `,`
/// yields none. Empty pieces between commas are kept.
#[must_use]
pub fn parse_labels(field: &str) -> Vec<String> {
    let field = clean(field);
    let mut pieces: Vec<&str> = field.split(',').collect();
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces.into_iter().map(|l| clean(l).to_string()).collect()
}

/// Lazily reads [`JournalEntry`] records from a delimited export.
pub struct JournalReader<R: BufRead> {
    reader: R,
    delimiter: Vec<u8>,
    /// Records handed out so far.
    record: usize,
    /// Set after end of input or the first error.
    done: bool,
}

impl<R: BufRead> JournalReader<R> {
    /// Creates a reader using [`DEFAULT_DELIMITER`].
    pub fn new(reader: R) -> Self {
        Self::with_delimiter(reader, DEFAULT_DELIMITER)
    }

    /// Creates a reader splitting on a custom delimiter.
    ///
    /// An empty delimiter falls back to [`DEFAULT_DELIMITER`].
    pub fn with_delimiter(reader: R, delimiter: &str) -> Self {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };
        Self {
            reader,
            delimiter: delimiter.as_bytes().to_vec(),
            record: 0,
            done: false,
        }
    }

    /// Reads the next raw token.
    ///
    /// Returns `Ok(None)` at end of input. The text after the last delimiter
    /// is returned as a final token unless it is empty.
    fn next_token(&mut self) -> Result<Option<String>> {
        let Some(&last) = self.delimiter.last() else {
            return Ok(None);
        };

        let mut buf = Vec::new();
        loop {
            let read = self
                .reader
                .read_until(last, &mut buf)
                .map_err(|e| Error::operation("read_journal", e))?;
            if read == 0 {
                if buf.is_empty() {
                    return Ok(None);
                }
                break;
            }
            if buf.ends_with(&self.delimiter) {
                buf.truncate(buf.len() - self.delimiter.len());
                break;
            }
        }

        String::from_utf8(buf).map(Some).map_err(|e| Error::MalformedRecord {
            record: self.record + 1,
            reason: format!("field is not valid UTF-8: {e}"),
        })
    }

    /// Reads one full record, or `None` if input ended cleanly.
    fn read_record(&mut self) -> Result<Option<JournalEntry>> {
        let mut fields = Vec::with_capacity(FIELDS_PER_RECORD);
        while fields.len() < FIELDS_PER_RECORD {
            match self.next_token()? {
                Some(token) => fields.push(token),
                None => break,
            }
        }

        // Trailing newline or row separator after the last record.
        if fields.is_empty() || (fields.len() == 1 && fields[0].trim().is_empty()) {
            return Ok(None);
        }

        let number = self.record + 1;
        let [title, description, labels, date]: [String; FIELDS_PER_RECORD] =
            fields.try_into().map_err(|f: Vec<String>| Error::MalformedRecord {
                record: number,
                reason: format!(
                    "expected {FIELDS_PER_RECORD} fields, input ended after {}",
                    f.len()
                ),
            })?;

        let date_millis = date
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::MalformedRecord {
                record: number,
                reason: format!("date '{}' is not an integer: {e}", date.trim()),
            })?;

        self.record = number;
        Ok(Some(JournalEntry {
            title: clean(&title).to_string(),
            description: clean(&description).to_string(),
            labels: parse_labels(&labels),
            date_millis,
        }))
    }

    /// Returns the number of records read so far.
    #[must_use]
    pub const fn records_read(&self) -> usize {
        self.record
    }
}

impl<R: BufRead> Iterator for JournalReader<R> {
    type Item = Result<JournalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Result<Vec<JournalEntry>> {
        JournalReader::new(Cursor::new(input.to_string())).collect()
    }

    #[test]
    fn test_clean_unwraps_quote_and_bracket() {
        assert_eq!(clean(r#""[inner text]""#), "inner text");
        assert_eq!(clean(r#""Lucid""#), "Lucid");
        assert_eq!(clean("plain"), "plain");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_clean_over_trims_misaligned_wrapping() {
        // Only the leading character is checked.
        assert_eq!(clean(r#""abc"#), "ab");
        assert_eq!(clean("[abc"), "ab");
        assert_eq!(clean("\""), "");
        assert_eq!(clean("[\"x\"]"), "x");
    }

    #[test]
    fn test_parse_labels() {
        assert!(parse_labels("").is_empty());
        assert!(parse_labels("[]").is_empty());
        assert!(parse_labels("\"[]\"").is_empty());
        assert_eq!(
            parse_labels("[Lucid,City Park,Nightmare]"),
            vec!["Lucid", "City Park", "Nightmare"]
        );
        assert_eq!(parse_labels(r#""[Lucid,Flying]""#), vec!["Lucid", "Flying"]);
        assert_eq!(parse_labels(r#"[Lucid,"Flying"]"#), vec!["Lucid", "Flying"]);
    }

    #[test]
    fn test_parse_labels_drops_trailing_empty_pieces() {
        assert_eq!(parse_labels("[a,b,]"), vec!["a", "b"]);
        assert_eq!(parse_labels("[a,b,,]"), vec!["a", "b"]);
        assert!(parse_labels("[,]").is_empty());
        assert!(parse_labels(",").is_empty());
        assert_eq!(parse_labels("[a,,b]"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_reads_records() {
        let input = "Flying多Over the city多[Lucid,CityPark]多1641038400000多\
                     Falling多Down多[]多1615766400000多";
        let entries = read_all(input).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Flying");
        assert_eq!(entries[0].description, "Over the city");
        assert_eq!(entries[0].labels, vec!["Lucid", "CityPark"]);
        assert_eq!(entries[0].date_millis, 1_641_038_400_000);
        assert!(entries[1].labels.is_empty());
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let entries = read_all("多多多0多").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "");
        assert!(entries[0].labels.is_empty());
    }

    #[test]
    fn test_trailing_newline_ends_cleanly() {
        let entries = read_all("a多b多[]多1多\n").unwrap();
        assert_eq!(entries.len(), 1);

        let entries = read_all("a多b多[]多1").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date_millis, 1);
    }

    #[test]
    fn test_multiline_description() {
        let entries = read_all("t多line one\nline two多[]多5多").unwrap();
        assert_eq!(entries[0].description, "line one\nline two");
    }

    #[test]
    fn test_short_record_fails() {
        let err = read_all("a多b多[]多1多c多d多").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { record: 2, .. }));
    }

    #[test]
    fn test_bad_date_fails() {
        let err = read_all("a多b多[]多yesterday多").unwrap_err();
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn test_custom_delimiter() {
        let reader = JournalReader::with_delimiter(Cursor::new("a||b||||7||"), "||");
        let entries: Vec<_> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "b");
        assert_eq!(entries[0].date_millis, 7);
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut reader = JournalReader::new(Cursor::new("a多b多[]多x多c多d多[]多1多"));
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
