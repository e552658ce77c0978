use std::path::PathBuf;

use tracing::{info, warn};

use crate::annotation::AnnotationDocument;
use crate::config::{CaptionDatasetConfig, FormatErrorPolicy};
use crate::constants::dataset::{DATASET_NAME, SKIP_MALFORMED_MSG, SKIP_UNREADABLE_MSG};
use crate::corpus::{CorpusIndex, Record};
use crate::errors::DatasetError;
use crate::filter::AnnotationFilter;
use crate::image_loader::{ImageLoader, RawImageLoader};
use crate::serialize::serialize_annotation;
use crate::splits::{SplitLabel, split_records};
use crate::types::CaptionText;

/// Indexed, length-queryable view consumed by a training loop.
///
/// Implementations must be `Send + Sync` so entries can be read from several
/// threads at once.
pub trait IndexedDataset: Send + Sync {
    /// Item returned by [`IndexedDataset::get`].
    type Item;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the entry at `index`.
    fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;

    /// Human-readable dataset name.
    fn name(&self) -> &str {
        "dataset"
    }
}

/// An image path with its serialized caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Image file backing this entry.
    pub image_path: PathBuf,
    /// Serialized caption used as the training target.
    pub caption: CaptionText,
}

/// Caption dataset over one split of a paired image/annotation corpus.
///
/// All indexing, splitting, and caption serialization happens in the
/// constructor. Images are loaded on each [`CaptionDataset::get`] call.
#[derive(Debug)]
pub struct CaptionDataset<L = RawImageLoader> {
    config: CaptionDatasetConfig,
    entries: Vec<ParsedEntry>,
    loader: L,
}

impl CaptionDataset<RawImageLoader> {
    /// Build a dataset that returns raw image bytes.
    pub fn new(config: CaptionDatasetConfig) -> Result<Self, DatasetError> {
        Self::with_loader(config, RawImageLoader)
    }
}

impl<L: ImageLoader> CaptionDataset<L> {
    /// Build a dataset that loads images with `loader`.
    pub fn with_loader(config: CaptionDatasetConfig, loader: L) -> Result<Self, DatasetError> {
        let ratios = config.split_ratios.normalized()?;
        let filter = AnnotationFilter::from_keys(&config.caption_keys, config.max_players);
        info!(
            max_players = config.max_players,
            "only the first max_players characters of each document are used"
        );

        let scan = CorpusIndex::new(&config.images_folder, &config.jsons_folder)
            .with_follow_links(config.follow_links)
            .scan()?;
        let records = split_records(scan.records, ratios, config.seed)?.into_split(config.split);
        let entries = parse_records(&records, &filter, &config)?;

        info!(
            split = %config.split,
            records = records.len(),
            entries = entries.len(),
            missing_annotations = scan.missing_annotations.len(),
            "caption dataset ready"
        );
        Ok(Self {
            config,
            entries,
            loader,
        })
    }

    /// Number of parsed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries survived parsing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Caption and freshly loaded image for `index`.
    pub fn get(&self, index: usize) -> Result<(CaptionText, L::Image), DatasetError> {
        let entry = self.entry(index)?;
        let image = self.loader.load(&entry.image_path)?;
        Ok((entry.caption.clone(), image))
    }

    /// Parsed entry at `index` without loading the image.
    pub fn entry(&self, index: usize) -> Result<&ParsedEntry, DatasetError> {
        self.entries
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// All parsed entries in split order.
    pub fn entries(&self) -> &[ParsedEntry] {
        &self.entries
    }

    /// Split this dataset exposes.
    pub fn split(&self) -> SplitLabel {
        self.config.split
    }

    /// Pass-through task prompt.
    pub fn task_prompt(&self) -> Option<&str> {
        self.config.task_prompt.as_deref()
    }

    /// Configuration used to build this dataset.
    pub fn config(&self) -> &CaptionDatasetConfig {
        &self.config
    }
}

impl<L: ImageLoader> IndexedDataset for CaptionDataset<L> {
    type Item = (CaptionText, L::Image);

    fn len(&self) -> usize {
        CaptionDataset::len(self)
    }

    fn get(&self, index: usize) -> Result<Self::Item, DatasetError> {
        CaptionDataset::get(self, index)
    }

    fn name(&self) -> &str {
        DATASET_NAME
    }
}

fn parse_records(
    records: &[Record],
    filter: &AnnotationFilter,
    config: &CaptionDatasetConfig,
) -> Result<Vec<ParsedEntry>, DatasetError> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        match parse_record(record, filter, config.convert_to_tokens) {
            Ok(caption) => entries.push(ParsedEntry {
                image_path: record.image_path.clone(),
                caption,
            }),
            Err(err) if err.is_document_error() => {
                warn!(
                    path = %record.annotation_path.display(),
                    error = %err,
                    SKIP_UNREADABLE_MSG
                );
            }
            Err(err)
                if err.is_format_error()
                    && config.format_error_policy == FormatErrorPolicy::Skip =>
            {
                warn!(
                    path = %record.annotation_path.display(),
                    error = %err,
                    SKIP_MALFORMED_MSG
                );
            }
            Err(err) => return Err(err),
        }
    }
    Ok(entries)
}

fn parse_record(
    record: &Record,
    filter: &AnnotationFilter,
    convert_to_tokens: bool,
) -> Result<CaptionText, DatasetError> {
    let document = AnnotationDocument::load(&record.annotation_path)?;
    let annotation = filter.filter(&document)?;
    serialize_annotation(&annotation, convert_to_tokens)
}
