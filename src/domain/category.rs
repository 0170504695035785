use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategoryName, MediaPath};

/// Catalog category, e.g. "Rings" or "Necklaces".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub image_url: Option<MediaPath>,
    pub description: Option<CategoryDescription>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Every media file owned by this record.
    pub fn media_paths(&self) -> Vec<MediaPath> {
        self.image_url.iter().cloned().collect()
    }
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub image_url: Option<MediaPath>,
    pub description: Option<CategoryDescription>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update of a [`Category`]; `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategory {
    pub name: Option<CategoryName>,
    pub image_url: Option<MediaPath>,
    pub description: Option<CategoryDescription>,
    pub updated_at: NaiveDateTime,
}
