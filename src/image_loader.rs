use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DatasetError;

/// Loads the image behind a parsed entry at access time.
///
/// Implementations must be `Send + Sync` so a dataset can serve concurrent readers.
pub trait ImageLoader: Send + Sync {
    /// Loaded image representation.
    type Image;

    /// Load the image stored at `path`.
    fn load(&self, path: &Path) -> Result<Self::Image, DatasetError>;
}

/// Undecoded image file contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBytes {
    /// Source path.
    pub path: PathBuf,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Loader that returns raw file bytes and leaves decoding to the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawImageLoader;

impl ImageLoader for RawImageLoader {
    type Image = ImageBytes;

    fn load(&self, path: &Path) -> Result<Self::Image, DatasetError> {
        let bytes = fs::read(path).map_err(|err| DatasetError::ImageLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(ImageBytes {
            path: path.to_path_buf(),
            bytes,
        })
    }
}

#[cfg(feature = "image")]
pub use decoded::DecodedImageLoader;

#[cfg(feature = "image")]
mod decoded {
    use std::path::Path;

    use super::ImageLoader;
    use crate::errors::DatasetError;

    /// Loader that decodes PNG/JPEG files with the `image` crate.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct DecodedImageLoader;

    impl ImageLoader for DecodedImageLoader {
        type Image = image::DynamicImage;

        fn load(&self, path: &Path) -> Result<Self::Image, DatasetError> {
            image::open(path).map_err(|err| DatasetError::ImageLoad {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn raw_loader_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let image = RawImageLoader.load(&path).unwrap();
        assert_eq!(image.path, path);
        assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn raw_loader_reports_missing_files() {
        let dir = tempdir().unwrap();
        let err = RawImageLoader.load(&dir.path().join("gone.png")).unwrap_err();
        assert!(matches!(err, DatasetError::ImageLoad { .. }));
    }
}
