//! File formats read and written by the two pipeline stages.
//!
//! # Architecture
//!
//! - **Format adapters** in [`formats`] parse and render each file kind
//! - **Row adapters** implement the [`RowSink`] and [`RowSource`] traits
//!
//! Services in [`crate::services`] orchestrate these; nothing here knows about
//! templates or categories.
//!
//! # Examples
//!
//! ## Read a journal export
//!
//! ```rust,ignore
//! use dreamport::io::formats::JournalReader;
//! use std::io::BufReader;
//!
//! let file = std::fs::File::open("dream_info")?;
//! for entry in JournalReader::new(BufReader::new(file)) {
//!     println!("{}", entry?.title);
//! }
//! ```

pub mod formats;
pub mod traits;

pub use formats::{CsvRowSink, CsvRowSource, JournalReader, RowEncoding};
pub use traits::{RowSink, RowSource};
