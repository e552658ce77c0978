//! Rendering of filtered annotations into caption strings.

use indexmap::IndexMap;

use crate::constants::tokens::TAG_CHARACTER_COORDINATES;
use crate::errors::DatasetError;
use crate::filter::{AnnotationGroup, FilteredAnnotation};
use crate::types::{CaptionText, Tag};

/// Render `annotation` as a token string or as a literal structural dump.
pub fn serialize_annotation(
    annotation: &FilteredAnnotation,
    convert_to_tokens: bool,
) -> Result<CaptionText, DatasetError> {
    if convert_to_tokens {
        Ok(render_tokens(annotation))
    } else {
        render_literal(annotation)
    }
}

/// Join every `tag value` pair with single spaces.
///
/// Every occurrence of the coordinate tag is then removed from the joined
/// text, first with its trailing space and then bare, so `<loc_N>` tokens
/// appear inline and no `<od>` survives in the caption.
pub fn render_tokens(annotation: &FilteredAnnotation) -> CaptionText {
    let joined = annotation
        .iter()
        .flat_map(AnnotationGroup::tagged)
        .map(|(tag, value)| format!("{tag} {value}"))
        .collect::<Vec<_>>()
        .join(" ");
    joined
        .replace(&format!("{TAG_CHARACTER_COORDINATES} "), "")
        .replace(TAG_CHARACTER_COORDINATES, "")
}

/// Dump the filtered structure as a JSON array of tag-keyed objects.
///
/// Intended for inspection; the exact text is not a stable format.
pub fn render_literal(annotation: &FilteredAnnotation) -> Result<CaptionText, DatasetError> {
    let groups: Vec<IndexMap<Tag, &str>> = annotation
        .iter()
        .map(|group| group.tagged().into_iter().collect())
        .collect();
    Ok(serde_json::to_string(&groups)?)
}
