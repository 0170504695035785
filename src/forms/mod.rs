//! Multipart forms accepted by the catalog routes and their validated payloads.

use actix_multipart::form::tempfile::TempFile;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::types::{MediaKind, MediaPath};
use crate::media::{MediaStore, MediaStoreError};

pub mod categories;
pub mod jewelry;

/// Maximum accepted size of a single uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Rejections raised while inspecting an uploaded file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Only {kind} files are allowed for the {kind} field")]
    UnexpectedContentType { kind: MediaKind },
}

/// An uploaded file that passed the MIME allow-list for its field.
#[derive(Debug)]
pub struct UploadedFile {
    pub kind: MediaKind,
    pub file: NamedTempFile,
    pub original_name: Option<String>,
}

impl UploadedFile {
    /// Check the declared content type of a multipart file against `kind`.
    ///
    /// Empty parts, which browsers send for an untouched file input, count
    /// as no upload.
    pub fn accept(temp: TempFile, kind: MediaKind) -> Result<Option<Self>, UploadError> {
        if temp.size == 0 {
            return Ok(None);
        }

        let allowed = temp
            .content_type
            .as_ref()
            .is_some_and(|mime| kind.accepts_mime(mime.essence_str()));
        if !allowed {
            return Err(UploadError::UnexpectedContentType { kind });
        }

        Ok(Some(Self {
            kind,
            file: temp.file,
            original_name: temp.file_name,
        }))
    }

    /// Move the file into the media store and return its logical path.
    pub fn stage(self, store: &MediaStore) -> Result<MediaPath, MediaStoreError> {
        store.store_upload(self.kind, self.file, self.original_name.as_deref())
    }
}

/// Trim an optional text field, treating blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
