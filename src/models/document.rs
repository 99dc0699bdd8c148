//! Document collection records.
//!
//! A document collection is a list of heterogeneous JSON objects. Objects
//! whose `type` is `"dream"` are dreams; everything else is treated as a tag.
//! Both kinds are validated once, here, and keep any fields this crate does
//! not model in a flattened `extra` map so cloned templates round-trip intact.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Discriminator value that marks a dream document.
pub const DREAM_KIND: &str = "dream";

/// Identifier of a document (`_id`), also used as a tag reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new document ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Category a tag document is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    /// Plain tag.
    Tag,
    /// A person appearing in the dream.
    Character,
    /// A feeling.
    Emotion,
    /// A location.
    Place,
}

impl TagCategory {
    /// Returns all categories in bucket order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Tag, Self::Character, Self::Emotion, Self::Place]
    }

    /// Returns the wire value of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Character => "character",
            Self::Emotion => "emotion",
            Self::Place => "place",
        }
    }

    /// Parses a wire value. Matching is exact; the app writes lowercase.
    ///
    /// Returns `None` if the category is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tag" => Some(Self::Tag),
            "character" => Some(Self::Character),
            "emotion" => Some(Self::Emotion),
            "place" => Some(Self::Place),
            _ => None,
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dream document as stored by the journaling app.
///
/// Only `_id`, `type`, `title`, `description`, `tags` and `date` are
/// required; the remaining typed fields default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamDocument {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Revision stamp.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Discriminator, always `"dream"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Dream title.
    pub title: String,
    /// Dream body.
    pub description: String,
    /// Plain tag references. `null` marks a label that never resolved.
    pub tags: Vec<Option<DocumentId>>,
    /// Character references.
    #[serde(default)]
    pub characters: Vec<Option<DocumentId>>,
    /// Place references.
    #[serde(default)]
    pub places: Vec<Option<DocumentId>>,
    /// Emotion references.
    #[serde(default)]
    pub emotions: Vec<Option<DocumentId>>,
    /// Lucidity score, 0-10.
    #[serde(default)]
    pub lucidity: u32,
    /// Legacy lucid flag predating the lucidity score.
    #[serde(rename = "isLucid", default)]
    pub is_lucid: bool,
    /// Nightmare flag.
    #[serde(rename = "isNightmare", default)]
    pub is_nightmare: bool,
    /// Recurring dream flag.
    #[serde(rename = "isRecurrent", default)]
    pub is_recurrent: bool,
    /// Date as a `YYYYMMDD` integer.
    pub date: i64,
    /// Sort key mirror of `date`.
    #[serde(
        rename = "dateNegative",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_negative: Option<i64>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DreamDocument {
    /// Iterates every non-null reference in tag, character, place, emotion order.
    pub fn references(&self) -> impl Iterator<Item = &DocumentId> {
        self.tags
            .iter()
            .chain(&self.characters)
            .chain(&self.places)
            .chain(&self.emotions)
            .flatten()
    }
}

/// A tag document: plain tag, character, emotion or place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDocument {
    /// Document identifier, referenced from dreams.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Revision stamp.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Display title.
    pub title: String,
    /// Raw category value; parsed when a dream references the tag.
    pub category: String,
    /// Fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parsed document of either kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// A dream.
    Dream(DreamDocument),
    /// Anything that is not a dream.
    Tag(TagDocument),
}

impl Document {
    /// Parses a raw collection entry, dispatching on its `type` field.
    ///
    /// `index` is the entry's position and is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if the entry lacks the fields its
    /// kind requires.
    pub fn from_value(index: usize, value: Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| Error::InvalidDocument {
            index,
            reason: e.to_string(),
        };

        if is_dream(&value) {
            serde_json::from_value(value).map(Self::Dream).map_err(invalid)
        } else {
            serde_json::from_value(value).map(Self::Tag).map_err(invalid)
        }
    }

    /// Returns the document identifier.
    #[must_use]
    pub const fn id(&self) -> &DocumentId {
        match self {
            Self::Dream(d) => &d.id,
            Self::Tag(t) => &t.id,
        }
    }
}

/// Returns whether a raw entry is a dream document.
#[must_use]
pub fn is_dream(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(DREAM_KIND)
}
