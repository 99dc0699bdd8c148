//! Label list reader.
//!
//! One label per line, as dumped by `select * from table_labels;`.

use crate::{Error, Result};
use std::io::BufRead;

/// Reads every line as a label, keeping blank lines and file order.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not valid UTF-8.
pub fn read_labels<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| {
            line.map_err(|e| Error::InvalidInput(format!("label line {}: {e}", i + 1)))
        })
        .collect()
}
