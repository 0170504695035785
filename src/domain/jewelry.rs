use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, CategoryName, JewelryId, JewelryName, JewelryPrice, JewelrySku, MediaPath,
    PrimaryMedia,
};

/// A piece of jewelry listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JewelryItem {
    pub id: JewelryId,
    pub name: JewelryName,
    pub category_id: Option<CategoryId>,
    /// Name of the referenced category as it was when this item was last
    /// written. Renaming the category later does not update it.
    pub category_name: Option<CategoryName>,
    pub sku: Option<JewelrySku>,
    pub price: Option<JewelryPrice>,
    pub media: Option<PrimaryMedia>,
    pub additional_images: Vec<MediaPath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl JewelryItem {
    pub fn image_url(&self) -> Option<&MediaPath> {
        self.media.as_ref().and_then(PrimaryMedia::image)
    }

    pub fn video_url(&self) -> Option<&MediaPath> {
        self.media.as_ref().and_then(PrimaryMedia::video)
    }

    /// Every media file owned by this record: the primary media first, then
    /// the gallery in order.
    pub fn media_paths(&self) -> Vec<MediaPath> {
        self.media
            .iter()
            .map(|media| media.path().clone())
            .chain(self.additional_images.iter().cloned())
            .collect()
    }
}

/// Information required to create a new [`JewelryItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewJewelryItem {
    pub name: JewelryName,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<CategoryName>,
    pub sku: Option<JewelrySku>,
    pub price: Option<JewelryPrice>,
    pub media: Option<PrimaryMedia>,
    pub additional_images: Vec<MediaPath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update of a [`JewelryItem`]; `None` leaves a field untouched.
///
/// Setting `media` replaces the primary media as a whole, so a new image
/// clears a stored video and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateJewelryItem {
    pub name: Option<JewelryName>,
    /// `Some((id, snapshot))` re-points the item and rewrites the snapshot.
    pub category: Option<(CategoryId, Option<CategoryName>)>,
    pub sku: Option<JewelrySku>,
    pub price: Option<JewelryPrice>,
    pub media: Option<PrimaryMedia>,
    pub updated_at: NaiveDateTime,
}
