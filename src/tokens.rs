use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::tokens::{
    COORDINATE_SCALE, TAG_CHARACTER_COORDINATES, TAG_EMOTION, TAG_GENERAL_DESCRIPTION,
    TAG_HASHTAGS, TAG_IMAGE_RANKING_SCORE, TAG_JERSEY_COLOR, TAG_JERSEY_NAME, TAG_JERSEY_NUMBER,
    TAG_POSE, TAG_TEAM_NAME,
};
use crate::errors::DatasetError;
use crate::types::Tag;

/// Closed set of caption fields the annotation filter understands.
///
/// Every variant maps to exactly one tag through [`CaptionField::tag`]; the
/// exhaustive match keeps the table complete at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionField {
    /// Character emotion.
    Emotion,
    /// Character pose.
    Pose,
    /// Character jersey number.
    JerseyNumber,
    /// Character jersey name.
    JerseyName,
    /// Character jersey color.
    JerseyColor,
    /// Character team name.
    TeamName,
    /// Document ranking score.
    ImageRankingScore,
    /// Document hashtag list.
    Hashtags,
    /// Document free-text description.
    GeneralDescription,
    /// Character bounding box in normalized coordinates.
    CharacterCoordinates,
}

impl CaptionField {
    /// All fields in declaration order.
    pub const ALL: [CaptionField; 10] = [
        CaptionField::Emotion,
        CaptionField::Pose,
        CaptionField::JerseyNumber,
        CaptionField::JerseyName,
        CaptionField::JerseyColor,
        CaptionField::TeamName,
        CaptionField::ImageRankingScore,
        CaptionField::Hashtags,
        CaptionField::GeneralDescription,
        CaptionField::CharacterCoordinates,
    ];

    /// Field name as it appears in annotation documents.
    pub const fn name(self) -> &'static str {
        match self {
            CaptionField::Emotion => "emotion",
            CaptionField::Pose => "pose",
            CaptionField::JerseyNumber => "jersey_number",
            CaptionField::JerseyName => "jersey_name",
            CaptionField::JerseyColor => "jersey_color",
            CaptionField::TeamName => "team_name",
            CaptionField::ImageRankingScore => "image_ranking_score",
            CaptionField::Hashtags => "hashtags",
            CaptionField::GeneralDescription => "general_description",
            CaptionField::CharacterCoordinates => "character_coordinates",
        }
    }

    /// Tag emitted in place of the field name.
    pub const fn tag(self) -> Tag {
        match self {
            CaptionField::Emotion => TAG_EMOTION,
            CaptionField::Pose => TAG_POSE,
            CaptionField::JerseyNumber => TAG_JERSEY_NUMBER,
            CaptionField::JerseyName => TAG_JERSEY_NAME,
            CaptionField::JerseyColor => TAG_JERSEY_COLOR,
            CaptionField::TeamName => TAG_TEAM_NAME,
            CaptionField::ImageRankingScore => TAG_IMAGE_RANKING_SCORE,
            CaptionField::Hashtags => TAG_HASHTAGS,
            CaptionField::GeneralDescription => TAG_GENERAL_DESCRIPTION,
            CaptionField::CharacterCoordinates => TAG_CHARACTER_COORDINATES,
        }
    }

    /// Look up a field by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for CaptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaptionField {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| DatasetError::Configuration(format!("unknown caption field '{s}'")))
    }
}

/// Convert normalized coordinates into concatenated `<loc_N>` tokens.
///
/// Each value is scaled by 1000 and truncated toward zero. Values outside
/// `[0, 1]` are not clamped.
pub fn coordinate_tokens(coords: &[f64]) -> String {
    coords
        .iter()
        .map(|coord| format!("<loc_{}>", (coord * COORDINATE_SCALE) as i64))
        .collect()
}
