use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::annotation::{AnnotationDocument, Character};
use crate::constants::tokens::HASHTAG_SEPARATOR;
use crate::errors::DatasetError;
use crate::tokens::{CaptionField, coordinate_tokens};
use crate::types::Tag;

/// One mapping in a filtered annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationGroup {
    /// Requested fields of one retained character, in request order.
    Character(IndexMap<CaptionField, String>),
    /// A single document-level field.
    Document(CaptionField, String),
}

impl AnnotationGroup {
    /// `(field, value)` pairs in insertion order.
    pub fn fields(&self) -> Vec<(CaptionField, &str)> {
        match self {
            AnnotationGroup::Character(fields) => fields
                .iter()
                .map(|(field, value)| (*field, value.as_str()))
                .collect(),
            AnnotationGroup::Document(field, value) => vec![(*field, value.as_str())],
        }
    }

    /// `(tag, value)` pairs in insertion order.
    pub fn tagged(&self) -> Vec<(Tag, &str)> {
        self.fields()
            .into_iter()
            .map(|(field, value)| (field.tag(), value))
            .collect()
    }

    /// Number of tag/value pairs in this group.
    pub fn len(&self) -> usize {
        match self {
            AnnotationGroup::Character(fields) => fields.len(),
            AnnotationGroup::Document(..) => 1,
        }
    }

    /// True when the group carries no pairs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered mappings: one per retained character, then description, hashtags,
/// and ranking score when requested.
pub type FilteredAnnotation = Vec<AnnotationGroup>;

/// Extracts requested caption fields from annotation documents.
#[derive(Clone, Debug)]
pub struct AnnotationFilter {
    fields: Vec<CaptionField>,
    max_players: usize,
}

impl AnnotationFilter {
    /// Build a filter from already-resolved fields.
    ///
    /// Duplicate fields keep their first position.
    pub fn new(fields: impl IntoIterator<Item = CaptionField>, max_players: usize) -> Self {
        let mut resolved = Vec::new();
        for field in fields {
            if !resolved.contains(&field) {
                resolved.push(field);
            }
        }
        Self {
            fields: resolved,
            max_players,
        }
    }

    /// Build a filter from raw caption key names.
    ///
    /// Names outside the tag table are dropped with a single warning each.
    pub fn from_keys<I, S>(keys: I, max_players: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = keys.into_iter().filter_map(|key| {
            let key = key.as_ref();
            let field = CaptionField::from_name(key);
            if field.is_none() {
                warn!(caption_key = key, "ignoring caption key without a tag");
            }
            field
        });
        Self::new(fields.collect::<Vec<_>>(), max_players)
    }

    /// Requested fields in request order.
    pub fn fields(&self) -> &[CaptionField] {
        &self.fields
    }

    /// Maximum number of characters kept per document.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    fn requests(&self, field: CaptionField) -> bool {
        self.fields.contains(&field)
    }

    /// Filter `document` into its tagged intermediate form.
    ///
    /// Characters beyond `max_players` are dropped silently.
    pub fn filter(&self, document: &AnnotationDocument) -> Result<FilteredAnnotation, DatasetError> {
        let mut filtered: FilteredAnnotation = document
            .characters
            .iter()
            .take(self.max_players)
            .map(|character| self.filter_character(character).map(AnnotationGroup::Character))
            .collect::<Result<_, _>>()?;

        if self.requests(CaptionField::GeneralDescription) {
            filtered.push(AnnotationGroup::Document(
                CaptionField::GeneralDescription,
                document.description(),
            ));
        }
        if self.requests(CaptionField::Hashtags) {
            filtered.push(AnnotationGroup::Document(
                CaptionField::Hashtags,
                document.hashtag_list()?.join(HASHTAG_SEPARATOR),
            ));
        }
        if self.requests(CaptionField::ImageRankingScore) {
            filtered.push(AnnotationGroup::Document(
                CaptionField::ImageRankingScore,
                document.ranking_score()?.to_string(),
            ));
        }
        Ok(filtered)
    }

    fn filter_character(
        &self,
        character: &Character,
    ) -> Result<IndexMap<CaptionField, String>, DatasetError> {
        let mut fields = IndexMap::new();
        for &field in &self.fields {
            let Some(value) = character.get(field.name()) else {
                continue;
            };
            let rendered = match field {
                CaptionField::CharacterCoordinates => coordinate_tokens(&coordinates(value)?),
                _ => render_value(value),
            };
            fields.insert(field, rendered);
        }
        Ok(fields)
    }
}

fn coordinates(value: &Value) -> Result<Vec<f64>, DatasetError> {
    let invalid = || DatasetError::CoordinateFormat {
        value: value.to_string(),
    };
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|coord| coord.as_f64().ok_or_else(invalid))
        .collect()
}

/// Render a raw field value as caption text.
///
/// Strings are used as-is, null is empty, everything else is compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
