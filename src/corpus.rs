use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::indexing::{ANNOTATION_EXTENSION, IMAGE_EXTENSIONS, MISSING_ANNOTATION_MSG};
use crate::errors::DatasetError;
use crate::types::RecordId;

/// One image paired with its annotation document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Image file stem shared by both files.
    pub id: RecordId,
    /// Path to the image file.
    pub image_path: PathBuf,
    /// Path to the annotation document.
    pub annotation_path: PathBuf,
}

/// Result of scanning an images directory.
#[derive(Clone, Debug, Default)]
pub struct CorpusScan {
    /// Images that have an annotation document.
    pub records: Vec<Record>,
    /// Images skipped because no annotation document exists.
    pub missing_annotations: Vec<PathBuf>,
}

/// Pairs images with same-named JSON documents in a separate directory.
pub struct CorpusIndex {
    images_dir: PathBuf,
    annotations_dir: PathBuf,
    follow_links: bool,
}

impl CorpusIndex {
    /// Create an index over `images_dir`, looking up documents in `annotations_dir`.
    pub fn new(images_dir: impl Into<PathBuf>, annotations_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            annotations_dir: annotations_dir.into(),
            follow_links: true,
        }
    }

    /// Control whether symlinked images are followed.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Expected annotation path for an image: `<annotations_dir>/<stem>.json`.
    pub fn annotation_path_for(&self, image_path: &Path) -> Option<PathBuf> {
        let stem = image_path.file_stem()?;
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(ANNOTATION_EXTENSION);
        Some(self.annotations_dir.join(name))
    }

    /// List image files directly under the images directory, sorted by file name.
    pub fn image_files(&self) -> Result<Vec<PathBuf>, DatasetError> {
        let walker = WalkDir::new(&self.images_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        let mut images = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && is_image_file(entry.path()) {
                images.push(entry.into_path());
            }
        }
        Ok(images)
    }

    /// Pair every image with its annotation document.
    ///
    /// Images without a document are logged and listed in
    /// [`CorpusScan::missing_annotations`]; they never fail the scan.
    pub fn scan(&self) -> Result<CorpusScan, DatasetError> {
        let mut scan = CorpusScan::default();
        for image_path in self.image_files()? {
            let annotation_path = self.annotation_path_for(&image_path);
            match annotation_path {
                Some(annotation_path) if annotation_path.is_file() => {
                    scan.records.push(Record {
                        id: record_id_for(&image_path),
                        image_path,
                        annotation_path,
                    });
                }
                _ => {
                    warn!(image = %image_path.display(), MISSING_ANNOTATION_MSG);
                    scan.missing_annotations.push(image_path);
                }
            }
        }
        debug!(
            images_dir = %self.images_dir.display(),
            paired = scan.records.len(),
            missing = scan.missing_annotations.len(),
            "indexed corpus"
        );
        Ok(scan)
    }
}

/// True if the path has an accepted image extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

fn record_id_for(image_path: &Path) -> RecordId {
    image_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file(Path::new("a.png")));
        assert!(is_image_file(Path::new("a.JPG")));
        assert!(is_image_file(Path::new("dir/a.Jpeg")));
        assert!(!is_image_file(Path::new("a.gif")));
        assert!(!is_image_file(Path::new("a.json")));
        assert!(!is_image_file(Path::new("png")));
    }

    #[test]
    fn annotation_path_replaces_extension() {
        let index = CorpusIndex::new("/imgs", "/anns");
        assert_eq!(
            index.annotation_path_for(Path::new("/imgs/shot.v2.JPG")),
            Some(PathBuf::from("/anns/shot.v2.json"))
        );
    }

    #[test]
    fn scan_pairs_images_and_reports_missing_documents() {
        let images = tempdir().unwrap();
        let annotations = tempdir().unwrap();
        for name in ["a.png", "b.jpg", "c.jpeg", "d.PNG", "e.png", "notes.txt"] {
            fs::write(images.path().join(name), b"img").unwrap();
        }
        for stem in ["a", "b", "c", "d"] {
            fs::write(annotations.path().join(format!("{stem}.json")), b"{}").unwrap();
        }
        fs::create_dir(images.path().join("nested.png")).unwrap();

        let scan = CorpusIndex::new(images.path(), annotations.path())
            .scan()
            .unwrap();
        let ids: Vec<&str> = scan.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(scan.missing_annotations, vec![images.path().join("e.png")]);
        assert_eq!(
            scan.records[3].annotation_path,
            annotations.path().join("d.json")
        );
    }

    #[test]
    fn missing_images_dir_is_an_error() {
        let root = tempdir().unwrap();
        let err = CorpusIndex::new(root.path().join("absent"), root.path())
            .scan()
            .unwrap_err();
        assert!(matches!(err, DatasetError::Walk(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_images_respect_follow_links() {
        let outside = tempdir().unwrap();
        let images = tempdir().unwrap();
        let annotations = tempdir().unwrap();
        fs::write(outside.path().join("real.png"), b"img").unwrap();
        fs::write(images.path().join("a.png"), b"img").unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.png"), images.path().join("b.png"))
            .unwrap();
        for stem in ["a", "b"] {
            fs::write(annotations.path().join(format!("{stem}.json")), b"{}").unwrap();
        }

        let followed = CorpusIndex::new(images.path(), annotations.path())
            .scan()
            .unwrap();
        assert_eq!(followed.records.len(), 2);

        let skipped = CorpusIndex::new(images.path(), annotations.path())
            .with_follow_links(false)
            .scan()
            .unwrap();
        let ids: Vec<&str> = skipped.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }
}
