/// Stable record identifier: the image file stem.
/// Example: `match_0042`
pub type RecordId = String;
/// Canonical caption field name as it appears in annotation documents.
/// Examples: `emotion`, `jersey_number`, `character_coordinates`
pub type FieldName = String;
/// Bracketed tag substituted for a field name in serialized output.
/// Examples: `<emo>`, `<jnu>`, `<gdesc>`
pub type Tag = &'static str;
/// Serialized caption text used as a training target.
/// Example: `<loc_120><loc_80><loc_410><loc_930> <emo> happy <gdesc> Two players celebrate.`
pub type CaptionText = String;
/// Optional instruction passed through to the training framework.
/// Example: `<CAPTION_TO_PHRASE_GROUNDING>`
pub type TaskPrompt = String;
