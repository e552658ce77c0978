#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Annotation document model and document-level field decoding.
pub mod annotation;
/// Dataset construction parameters.
pub mod config;
/// Centralized constants used across indexing, splitting, and tokenization.
pub mod constants;
/// Image/annotation pairing over directories.
pub mod corpus;
/// Dataset facade exposed to training loops.
pub mod dataset;
/// Reusable example runners shared by the demos.
pub mod example_apps;
/// Extraction of requested caption fields into a tagged intermediate.
pub mod filter;
/// Image loading seam used at access time.
pub mod image_loader;
/// Rendering of filtered annotations into caption strings.
pub mod serialize;
/// Split labels, ratios, and the deterministic splitter.
pub mod splits;
/// Caption field tag table and coordinate tokens.
pub mod tokens;
/// Shared type aliases.
pub mod types;
/// Text helpers.
pub mod utils;

mod errors;

pub use annotation::{AnnotationDocument, Character};
pub use config::{CaptionDatasetConfig, FormatErrorPolicy};
pub use corpus::{CorpusIndex, CorpusScan, Record};
pub use dataset::{CaptionDataset, IndexedDataset, ParsedEntry};
pub use errors::DatasetError;
pub use filter::{AnnotationFilter, AnnotationGroup, FilteredAnnotation};
#[cfg(feature = "image")]
pub use image_loader::DecodedImageLoader;
pub use image_loader::{ImageBytes, ImageLoader, RawImageLoader};
pub use serialize::{render_literal, render_tokens, serialize_annotation};
pub use splits::{SplitLabel, SplitRatios, SplitSet, split_records};
pub use tokens::{CaptionField, coordinate_tokens};
pub use types::{CaptionText, FieldName, RecordId, Tag, TaskPrompt};
