use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::dataset::{DEFAULT_MAX_PLAYERS, DEFAULT_SEED};
use crate::splits::{SplitLabel, SplitRatios};
use crate::types::{FieldName, TaskPrompt};

/// What to do when a loaded document has a malformed hashtag, ranking score,
/// or coordinate value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatErrorPolicy {
    /// Log the error and drop the entry, like unreadable documents.
    #[default]
    Skip,
    /// Fail dataset construction with the first error.
    Abort,
}

/// Construction parameters for [`crate::CaptionDataset`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptionDatasetConfig {
    /// Split exposed by the dataset.
    pub split: SplitLabel,
    /// Directory holding `.png`/`.jpg`/`.jpeg` images.
    pub images_folder: PathBuf,
    /// Directory holding `<stem>.json` annotation documents.
    pub jsons_folder: PathBuf,
    /// Instruction passed through to the training framework untouched.
    pub task_prompt: Option<TaskPrompt>,
    /// Requested caption fields, in output order.
    pub caption_keys: Vec<FieldName>,
    /// Characters kept per document.
    pub max_players: usize,
    /// Emit token strings (`true`) or a literal structural dump (`false`).
    pub convert_to_tokens: bool,
    /// Train/validation/test fractions.
    pub split_ratios: SplitRatios,
    /// Seed for the split shuffle.
    pub seed: u64,
    /// Handling of malformed document fields.
    pub format_error_policy: FormatErrorPolicy,
    /// Whether symlinked images in `images_folder` are indexed.
    pub follow_links: bool,
}

impl Default for CaptionDatasetConfig {
    fn default() -> Self {
        Self {
            split: SplitLabel::Train,
            images_folder: PathBuf::new(),
            jsons_folder: PathBuf::new(),
            task_prompt: None,
            caption_keys: Vec::new(),
            max_players: DEFAULT_MAX_PLAYERS,
            convert_to_tokens: true,
            split_ratios: SplitRatios::default(),
            seed: DEFAULT_SEED,
            format_error_policy: FormatErrorPolicy::default(),
            follow_links: true,
        }
    }
}

impl CaptionDatasetConfig {
    /// Create a config for the given image and annotation directories.
    pub fn new(images_folder: impl Into<PathBuf>, jsons_folder: impl Into<PathBuf>) -> Self {
        Self {
            images_folder: images_folder.into(),
            jsons_folder: jsons_folder.into(),
            ..Self::default()
        }
    }

    /// Select the exposed split.
    pub fn with_split(mut self, split: SplitLabel) -> Self {
        self.split = split;
        self
    }

    /// Set the pass-through task prompt.
    pub fn with_task_prompt(mut self, task_prompt: impl Into<TaskPrompt>) -> Self {
        self.task_prompt = Some(task_prompt.into());
        self
    }

    /// Set the requested caption fields.
    pub fn with_caption_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.caption_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Override the per-document character limit.
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Choose token output or literal output.
    pub fn with_convert_to_tokens(mut self, convert_to_tokens: bool) -> Self {
        self.convert_to_tokens = convert_to_tokens;
        self
    }

    /// Override split ratios.
    pub fn with_split_ratios(mut self, split_ratios: impl Into<SplitRatios>) -> Self {
        self.split_ratios = split_ratios.into();
        self
    }

    /// Override the split seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override handling of malformed document fields.
    pub fn with_format_error_policy(mut self, policy: FormatErrorPolicy) -> Self {
        self.format_error_policy = policy;
        self
    }

    /// Control whether symlinked images are indexed.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}
