use crate::splits::SplitLabel;

/// Tag table for every caption field the annotation filter can emit.
pub mod tokens {
    /// Tag for a character's emotion.
    pub const TAG_EMOTION: &str = "<emo>";
    /// Tag for a character's pose.
    pub const TAG_POSE: &str = "<pose>";
    /// Tag for a character's jersey number.
    pub const TAG_JERSEY_NUMBER: &str = "<jnu>";
    /// Tag for a character's jersey name.
    pub const TAG_JERSEY_NAME: &str = "<jna>";
    /// Tag for a character's jersey color.
    pub const TAG_JERSEY_COLOR: &str = "<jco>";
    /// Tag for a character's team name.
    pub const TAG_TEAM_NAME: &str = "<tname>";
    /// Tag for the document-level ranking score.
    pub const TAG_IMAGE_RANKING_SCORE: &str = "<ims>";
    /// Tag for the document-level hashtag list.
    pub const TAG_HASHTAGS: &str = "<hashtags>";
    /// Tag for the document-level free-text description.
    pub const TAG_GENERAL_DESCRIPTION: &str = "<gdesc>";
    /// Tag for character coordinates. Suppressed in token output.
    pub const TAG_CHARACTER_COORDINATES: &str = "<od>";

    /// Scale applied to normalized coordinates before truncation.
    pub const COORDINATE_SCALE: f64 = 1000.0;
    /// Separator used when joining parsed hashtags.
    pub const HASHTAG_SEPARATOR: &str = ", ";
}

/// Constants used by corpus indexing.
pub mod indexing {
    /// Accepted image extensions (compared case-insensitively).
    pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
    /// Extension of the annotation document paired with each image.
    pub const ANNOTATION_EXTENSION: &str = "json";
    /// Log message used when an image has no annotation document.
    pub const MISSING_ANNOTATION_MSG: &str = "annotation document does not exist for image";
}

/// Constants used by split assignment.
pub mod splits {
    use super::SplitLabel;

    /// Maximum allowed distance between the ratio sum and `1.0`.
    pub const RATIO_SUM_EPSILON: f64 = 1e-6;
    /// Default train fraction.
    pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
    /// Default validation fraction.
    pub const DEFAULT_VALIDATION_RATIO: f64 = 0.1;
    /// Default test fraction.
    pub const DEFAULT_TEST_RATIO: f64 = 0.1;
    /// Canonical split iteration order.
    pub const ALL_SPLITS: [SplitLabel; 3] =
        [SplitLabel::Train, SplitLabel::Validation, SplitLabel::Test];
}

/// Constants used by the dataset facade.
pub mod dataset {
    /// Name reported by the caption dataset.
    pub const DATASET_NAME: &str = "custom_captions";
    /// Default number of characters kept per document.
    pub const DEFAULT_MAX_PLAYERS: usize = 10;
    /// Default split seed.
    pub const DEFAULT_SEED: u64 = 42;
    /// Log message used when an annotation document cannot be loaded.
    pub const SKIP_UNREADABLE_MSG: &str = "skipping unreadable annotation document";
    /// Log message used when a document field has an unusable format.
    pub const SKIP_MALFORMED_MSG: &str = "skipping annotation with malformed field";
}
