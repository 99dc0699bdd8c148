//! Document collection adapter.
//!
//! Reads both a JSON array of documents and newline-delimited JSON (one
//! document per line). Writes a JSON array.

use crate::models::Document;
use crate::{Error, Result};
use serde_json::Value;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Reads a whole collection into memory.
///
/// The first non-whitespace character decides the layout: `[` means a JSON
/// array, anything else is read as one object per line.
///
/// # Errors
///
/// Returns an error if the input cannot be read or an entry is not valid JSON.
pub fn read_collection<R: BufRead>(mut reader: R) -> Result<Vec<Value>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| Error::operation("read_collection", e))?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse JSON array: {e}")));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line.trim()).map_err(|e| {
                Error::InvalidInput(format!("Line {}: Failed to parse JSON: {e}", i + 1))
            })
        })
        .collect()
}

/// Opens and reads a collection file.
///
/// The file is closed before this returns, whether parsing succeeded or not.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_collection_file(path: &Path) -> Result<Vec<Value>> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::operation("open_collection", format!("{}: {e}", path.display())))?;
    read_collection(BufReader::new(file))
}

/// Writes documents as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or I/O fails.
pub fn write_collection<W: Write>(
    mut writer: W,
    documents: &[Document],
    pretty: bool,
) -> Result<()> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, documents)
    } else {
        serde_json::to_writer(&mut writer, documents)
    };
    written.map_err(|e| Error::operation("write_collection", e))?;
    writeln!(writer).map_err(|e| Error::operation("write_collection", e))?;
    writer
        .flush()
        .map_err(|e| Error::operation("flush_collection", e))
}

/// Writes documents to a file, replacing it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_collection_file(path: &Path, documents: &[Document], pretty: bool) -> Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| Error::operation("create_collection", format!("{}: {e}", path.display())))?;
    write_collection(BufWriter::new(file), documents, pretty)
}
