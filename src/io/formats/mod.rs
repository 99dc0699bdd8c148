//! Format adapters for both pipeline stages.
//!
//! | Adapter | Stage | Reads | Writes |
//! |---------|-------|-------|--------|
//! | [`delimited`] | import | journal export | - |
//! | [`labels`] | import | label list | - |
//! | [`collection`] | both | document collection | document collection |
//! | [`rows`] | export | rows (inspection) | rows |

pub mod collection;
pub mod delimited;
pub mod labels;
pub mod rows;

pub use collection::{read_collection, read_collection_file, write_collection_file};
pub use delimited::{DEFAULT_DELIMITER, JournalReader, clean, parse_labels};
pub use labels::read_labels;
pub use rows::{CsvRowSink, CsvRowSource, RowEncoding};
