//! # Dreamport
//!
//! Moves dream-journal exports from one mobile journaling app into another,
//! and flattens the result into base64-safe CSV rows.
//!
//! The work happens in two independent stages that only share files on disk:
//!
//! - **Import** reads a delimited journal export plus a label list, clones
//!   field defaults from a sample document collection, and writes a new
//!   collection of tag and dream documents.
//! - **Export** reads a document collection, resolves each dream's tag
//!   references into tags, people, feelings and places, and emits one row
//!   per dream.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dreamport::io::formats::collection;
//! use dreamport::services::{ExportOptions, ExportService};
//!
//! let values = collection::read_collection_file("export.lucidity".as_ref())?;
//! let service = ExportService::new(ExportOptions::default());
//! let rows = service.convert(values)?;
//! println!("{} dreams", rows.len());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;

pub use config::DreamportConfig;
pub use models::{
    Document, DocumentId, DreamDocument, ExportedDream, FinalDream, JournalEntry, TagCategory,
    TagDocument,
};
pub use services::{ExportService, ImportService, TemplateSet};

/// Error type for dreamport operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unparsable JSON, bad CLI values, invalid UTF-8 |
/// | `MalformedRecord` | A journal record is short of fields or has a non-numeric date |
/// | `InvalidDocument` | A document lacks the fields its kind requires |
/// | `MissingTemplate` | The sample collection has no usable dream or tag template |
/// | `UnknownCategory` | A referenced tag carries a category outside the four known ones |
/// | `OperationFailed` | File I/O or serialization fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A delimited journal record could not be parsed.
    ///
    /// Raised when:
    /// - The stream ends before all four fields of a record were read
    /// - The date field is not a decimal integer
    #[error("record {record}: {reason}")]
    MalformedRecord {
        /// 1-indexed record number.
        record: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A document did not match the shape of its kind.
    #[error("document {index}: {reason}")]
    InvalidDocument {
        /// 0-indexed position in the collection.
        index: usize,
        /// Deserialization failure.
        reason: String,
    },

    /// No template of the given kind was found in the sample collection.
    #[error("missing template: no {0} document found in sample collection")]
    MissingTemplate(&'static str),

    /// A referenced tag has a category the categorizer does not route.
    ///
    /// Unresolved references are dropped silently, but an unknown category
    /// always aborts the run.
    #[error("tag {tag} has unknown category '{category}'")]
    UnknownCategory {
        /// Identifier of the offending tag.
        tag: String,
        /// The raw category value.
        category: String,
    },

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for dreamport operations.
pub type Result<T> = std::result::Result<T, Error>;
