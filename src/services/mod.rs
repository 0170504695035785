//! Service layer coordinating repositories with the media store.
//!
//! Routes stage uploaded files into the store before calling in here; the
//! services decide which staged files end up referenced by a record and
//! delete the rest, together with files a record stops referencing.

use crate::domain::types::MediaPath;
use crate::media::MediaPipeline;

pub use errors::{ServiceError, ServiceResult};

pub mod categories;
pub mod errors;
pub mod jewelry;

/// Files already moved into the media store for the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedMedia {
    pub image: Option<MediaPath>,
    pub video: Option<MediaPath>,
}

impl StagedMedia {
    pub fn image(image: MediaPath) -> Self {
        Self {
            image: Some(image),
            video: None,
        }
    }

    pub fn video(video: MediaPath) -> Self {
        Self {
            image: None,
            video: Some(video),
        }
    }

    pub fn paths(&self) -> Vec<MediaPath> {
        self.image.iter().chain(self.video.iter()).cloned().collect()
    }

    /// Pick the file the record will reference and finalize it.
    ///
    /// An image wins over a video; the losing video is deleted right away.
    pub(crate) fn select(self, media: &MediaPipeline) -> Option<MediaPath> {
        match (self.image, self.video) {
            (Some(image), video) => {
                if let Some(video) = video {
                    log::info!("Both image and video uploaded, discarding {video}");
                    media.purge(&[video]);
                }
                Some(media.finalize_upload(image))
            }
            (None, Some(video)) => Some(video),
            (None, None) => None,
        }
    }
}

/// Paths referenced before an update that are no longer referenced after it.
pub(crate) fn superseded(before: Vec<MediaPath>, after: &[MediaPath]) -> Vec<MediaPath> {
    before.into_iter().filter(|p| !after.contains(p)).collect()
}
