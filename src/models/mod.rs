//! Data models for dreamport.
//!
//! This module contains the core data structures shared by both stages.

mod document;
mod dream;

pub use document::{
    DREAM_KIND, Document, DocumentId, DreamDocument, TagCategory, TagDocument, is_dream,
};
pub use dream::{ExportedDream, FinalDream, JournalEntry, LEGACY_LUCID_SCORE};
