//! Tag resolution for exported dreams.

use crate::models::{DocumentId, ExportedDream, FinalDream, TagCategory, TagDocument};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Factor mapping the app's 0-10 lucidity onto the row's 0-100 scale.
pub const LUCIDITY_SCALE: u32 = 10;

/// Resolves label references into the four title buckets.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    tags: HashMap<DocumentId, TagDocument>,
    ignored: HashSet<String>,
}

impl Categorizer {
    /// Indexes tags by identifier. A later tag with the same identifier
    /// replaces an earlier one.
    #[must_use]
    pub fn new(tags: impl IntoIterator<Item = TagDocument>) -> Self {
        Self {
            tags: tags.into_iter().map(|t| (t.id.clone(), t)).collect(),
            ignored: HashSet::new(),
        }
    }

    /// Sets identifiers known to be missing; their misses log at `trace`.
    #[must_use]
    pub fn with_ignored<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Number of indexed tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns whether no tags are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Builds the output row for one dream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] if a referenced tag has a category
    /// outside [`TagCategory::all`].
    pub fn categorize(&self, dream: &ExportedDream) -> Result<FinalDream> {
        let mut out = FinalDream {
            title: dream.title.clone(),
            description: dream.description.clone(),
            date: dream.date,
            lucidity: dream.lucidity.saturating_mul(LUCIDITY_SCALE),
            nightmare: dream.nightmare,
            ..FinalDream::default()
        };

        for reference in &dream.labels {
            let Some(tag) = self.tags.get(reference) else {
                if self.ignored.contains(reference.as_str()) {
                    trace!(tag = %reference, title = %dream.title, "skipping known missing tag");
                } else {
                    debug!(tag = %reference, title = %dream.title, "dropping unresolved tag reference");
                }
                continue;
            };

            let category =
                TagCategory::parse(&tag.category).ok_or_else(|| Error::UnknownCategory {
                    tag: tag.id.to_string(),
                    category: tag.category.clone(),
                })?;

            let bucket = match category {
                TagCategory::Tag => &mut out.tags,
                TagCategory::Character => &mut out.people,
                TagCategory::Emotion => &mut out.feelings,
                TagCategory::Place => &mut out.places,
            };
            bucket.push(tag.title.clone());
        }

        Ok(out)
    }
}
