//! Sample-template location.
//!
//! Generated documents are cloned from real documents harvested out of an
//! existing collection, so they carry every default field the app expects.

use crate::models::{DreamDocument, TagDocument, is_dream};
use crate::{Error, Result};
use serde_json::Value;
use tracing::debug;

/// The two prototypes new documents are cloned from.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    /// Prototype for dream documents.
    pub dream: DreamDocument,
    /// Prototype for tag documents.
    pub tag: TagDocument,
}

/// Returns whether a raw entry can serve as the dream template: a dream with
/// no tags and a realism score of zero.
fn is_dream_template(value: &Value) -> bool {
    is_dream(value)
        && value
            .get("tags")
            .and_then(Value::as_array)
            .is_some_and(Vec::is_empty)
        && value.get("realism").and_then(Value::as_i64) == Some(0)
}

fn is_tag_template(value: &Value) -> bool {
    value.get("category").and_then(Value::as_str) == Some("tag")
}

impl TemplateSet {
    /// Scans a collection for the dream and tag templates.
    ///
    /// When several documents qualify, the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTemplate`] if either template is absent, or
    /// [`Error::InvalidDocument`] if the chosen one lacks required fields.
    pub fn locate(values: &[Value]) -> Result<Self> {
        let mut dream = None;
        let mut tag = None;

        for (index, value) in values.iter().enumerate() {
            if is_dream_template(value) {
                dream = Some((index, value));
            }
            if is_tag_template(value) {
                tag = Some((index, value));
            }
        }

        let (dream_index, dream) = dream.ok_or(Error::MissingTemplate("dream"))?;
        let (tag_index, tag) = tag.ok_or(Error::MissingTemplate("tag"))?;
        debug!(dream_index, tag_index, scanned = values.len(), "located templates");

        let invalid = |index: usize| {
            move |e: serde_json::Error| Error::InvalidDocument {
                index,
                reason: format!("unusable template: {e}"),
            }
        };

        Ok(Self {
            dream: serde_json::from_value(dream.clone()).map_err(invalid(dream_index))?,
            tag: serde_json::from_value(tag.clone()).map_err(invalid(tag_index))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Value> {
        vec![
            json!({"_id": "x", "type": "dream", "title": "tagged", "description": "",
                   "tags": ["t"], "realism": 0, "date": 1}),
            json!({"_id": "y", "type": "dream", "title": "real", "description": "",
                   "tags": [], "realism": 3, "date": 1}),
            json!({"_id": "z", "type": "dream", "title": "template", "description": "",
                   "tags": [], "realism": 0, "date": 1, "color": -1}),
            json!({"_id": "t1", "title": "Friend", "category": "character"}),
            json!({"_id": "t2", "title": "Flying", "category": "tag", "count": 0}),
        ]
    }

    #[test]
    fn test_locates_both_templates() {
        let templates = TemplateSet::locate(&sample()).unwrap();
        assert_eq!(templates.dream.title, "template");
        assert_eq!(templates.dream.extra.get("color"), Some(&json!(-1)));
        assert_eq!(templates.tag.title, "Flying");
        assert_eq!(templates.tag.extra.get("count"), Some(&json!(0)));
    }

    #[test]
    fn test_last_match_wins() {
        let mut values = sample();
        values.push(json!({"_id": "t3", "title": "Later", "category": "tag"}));
        let templates = TemplateSet::locate(&values).unwrap();
        assert_eq!(templates.tag.title, "Later");
    }

    #[test]
    fn test_missing_dream_template() {
        let values: Vec<Value> = sample().into_iter().filter(|v| v["_id"] != "z").collect();
        let err = TemplateSet::locate(&values).unwrap_err();
        assert!(matches!(err, Error::MissingTemplate("dream")));
    }

    #[test]
    fn test_missing_tag_template() {
        let values: Vec<Value> = sample().into_iter().filter(|v| v["_id"] != "t2").collect();
        let err = TemplateSet::locate(&values).unwrap_err();
        assert!(matches!(err, Error::MissingTemplate("tag")));
    }

    #[test]
    fn test_dream_without_realism_is_not_a_template() {
        let values = vec![
            json!({"_id": "z", "type": "dream", "title": "", "description": "",
                   "tags": [], "date": 1}),
            json!({"_id": "t2", "title": "Flying", "category": "tag"}),
        ];
        assert!(TemplateSet::locate(&values).is_err());
    }
}
