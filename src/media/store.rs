//! File-system storage for uploaded images and videos.
//!
//! Records only ever hold logical paths such as `/images/ring.webp`; this
//! module owns the mapping from those paths to files under the configured
//! media root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{MediaKind, MediaPath, TypeConstraintError};

/// Errors raised while placing files into the store.
#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("media store I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    InvalidPath(#[from] TypeConstraintError),
}

/// Media files rooted at a fixed directory with `images/` and `videos/`
/// subdirectories.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the per-kind directories if they do not exist yet.
    pub fn ensure_layout(&self) -> io::Result<()> {
        for kind in [MediaKind::Image, MediaKind::Video] {
            fs::create_dir_all(self.directory(kind))?;
        }
        Ok(())
    }

    /// Directory holding files of the given kind.
    pub fn directory(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Physical location of a logical path. Pure, touches no files.
    pub fn resolve(&self, path: &MediaPath) -> PathBuf {
        self.directory(path.kind()).join(path.file_name())
    }

    /// Logical path for a file that lives in the kind's directory.
    pub fn logical_path_for(
        &self,
        kind: MediaKind,
        physical: &Path,
    ) -> Result<MediaPath, TypeConstraintError> {
        let file_name = physical
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| TypeConstraintError::InvalidMediaPath(physical.display().to_string()))?;
        MediaPath::from_file_name(kind, file_name)
    }

    pub fn exists(&self, path: &MediaPath) -> bool {
        self.resolve(path).is_file()
    }

    /// Delete a stored file.
    ///
    /// Returns `false` when there was nothing to delete or the file system
    /// refused; refusals are logged, never raised.
    pub fn delete(&self, path: &MediaPath) -> bool {
        let physical = self.resolve(path);
        if !physical.is_file() {
            return false;
        }

        match fs::remove_file(&physical) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                log::warn!("Failed to delete media file {}: {e}", physical.display());
                false
            }
        }
    }

    /// Delete every path independently; results follow the input order.
    pub fn delete_many(&self, paths: &[MediaPath]) -> Vec<bool> {
        paths.iter().map(|path| self.delete(path)).collect()
    }

    /// Move an uploaded temporary file into the store under a fresh unique
    /// name, keeping the extension of the client-side file name.
    pub fn store_upload(
        &self,
        kind: MediaKind,
        file: NamedTempFile,
        original_name: Option<&str>,
    ) -> Result<MediaPath, MediaStoreError> {
        let directory = self.directory(kind);
        fs::create_dir_all(&directory)?;

        let file_name = unique_file_name(original_name);
        let target = directory.join(&file_name);

        if let Err(err) = file.persist(&target) {
            // Rename fails across file systems; copy and let the temp file drop.
            fs::copy(err.file.path(), &target)?;
        }

        Ok(MediaPath::from_file_name(kind, &file_name)?)
    }
}

/// `<unix-millis>-<random>.<ext>`; extension lower-cased, `bin` when missing.
fn unique_file_name(original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string());

    format!(
        "{}-{}.{extension}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
