//! Command handlers module.
//!
//! - `import.rs`: journal export to document collection
//! - `export.rs`: document collection to rows
//! - `decode.rs`: rows back to JSON for inspection

mod decode;
mod export;
mod import;

pub use decode::cmd_decode;
pub use export::cmd_export;
pub use import::cmd_import;
