//! Uploaded media: storage layout, image normalization and the small amount
//! of glue the services need to move a fresh upload into its final form.

use crate::domain::types::{MediaKind, MediaPath};

pub mod normalizer;
pub mod store;

pub use normalizer::{ConversionError, ImageNormalizer};
pub use store::{MediaStore, MediaStoreError};

/// Store and conversion policy shared by the catalog services.
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    pub store: MediaStore,
    pub normalizer: ImageNormalizer,
}

impl MediaPipeline {
    pub fn new(store: MediaStore, normalizer: ImageNormalizer) -> Self {
        Self { store, normalizer }
    }

    /// Bring a freshly stored upload into its final form.
    ///
    /// Supported images are converted to WebP and the returned path points at
    /// the converted file. Videos, unsupported images and images whose
    /// conversion fails keep their original path.
    pub fn finalize_upload(&self, path: MediaPath) -> MediaPath {
        if path.kind() != MediaKind::Image {
            return path;
        }

        let physical = self.store.resolve(&path);
        if !self.normalizer.is_supported_image(&physical) {
            log::warn!("Keeping {path} as uploaded: not a supported image format");
            return path;
        }

        let converted = match self.normalizer.normalize(&physical) {
            Ok(converted) => converted,
            Err(e) => {
                log::warn!("Keeping {path} as uploaded: {e}");
                return path;
            }
        };

        match self.store.logical_path_for(MediaKind::Image, &converted) {
            Ok(converted) => converted,
            Err(e) => {
                // Unreachable for names produced by the store.
                log::error!("Converted file {} has no valid URL: {e}", converted.display());
                path
            }
        }
    }

    /// Best-effort removal of files no record references any more.
    pub fn purge(&self, paths: &[MediaPath]) {
        if paths.is_empty() {
            return;
        }
        let results = self.store.delete_many(paths);
        for (path, deleted) in paths.iter().zip(results) {
            if !deleted {
                log::warn!("Media file {path} was not deleted");
            }
        }
    }
}
