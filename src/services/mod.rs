//! Pipeline services.
//!
//! Services orchestrate the format adapters in [`crate::io`] and provide the
//! two pipeline stages as high-level operations.

pub mod categorize;
pub mod export;
pub mod ids;
pub mod import;
pub mod templates;

pub use categorize::Categorizer;
pub use export::{ExportOptions, ExportResult, ExportService, KNOWN_MISSING_TAG};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use import::{DateZone, ImportOptions, ImportResult, ImportService, ProgressCallback};
pub use templates::TemplateSet;
