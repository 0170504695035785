use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::jewelry::{
    JewelryItem as DomainJewelryItem, NewJewelryItem as DomainNewJewelryItem,
    UpdateJewelryItem as DomainUpdateJewelryItem,
};
use crate::domain::types::{
    CategoryId, CategoryName, JewelryName, JewelryPrice, JewelrySku, MediaPath, PrimaryMedia,
    TypeConstraintError, validate_additional_images,
};
use crate::models::jewelry_image::JewelryImage;

/// Diesel model representing the `jewelry_items` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::jewelry_items)]
pub struct JewelryItem {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`JewelryItem`]. Gallery images go to `jewelry_images`.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::jewelry_items)]
pub struct NewJewelryItem {
    pub name: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial updates.
///
/// Outer `None` skips a column; `Some(None)` writes NULL, which is how a new
/// image clears the stored video and the other way round.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::jewelry_items)]
pub struct JewelryChangeset {
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub category_name: Option<Option<String>>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

fn split_media(media: Option<&PrimaryMedia>) -> (Option<String>, Option<String>) {
    match media {
        Some(PrimaryMedia::Image(path)) => (Some(path.to_string()), None),
        Some(PrimaryMedia::Video(path)) => (None, Some(path.to_string())),
        None => (None, None),
    }
}

impl TryFrom<(JewelryItem, Vec<JewelryImage>)> for DomainJewelryItem {
    type Error = TypeConstraintError;

    fn try_from((item, mut images): (JewelryItem, Vec<JewelryImage>)) -> Result<Self, Self::Error> {
        images.sort_by_key(|image| image.position);
        let additional_images = images
            .into_iter()
            .map(|image| MediaPath::new(image.url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: item.id.try_into()?,
            name: JewelryName::new(item.name)?,
            category_id: item.category_id.map(CategoryId::new).transpose()?,
            category_name: item
                .category_name
                .filter(|name| !name.trim().is_empty())
                .map(CategoryName::new)
                .transpose()?,
            sku: item
                .sku
                .filter(|sku| !sku.trim().is_empty())
                .map(JewelrySku::new)
                .transpose()?,
            price: item.price.map(JewelryPrice::new).transpose()?,
            media: PrimaryMedia::from_columns(item.image_url, item.video_url)?,
            additional_images: validate_additional_images(additional_images)?,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewJewelryItem> for NewJewelryItem {
    fn from(item: &'a DomainNewJewelryItem) -> Self {
        let (image_url, video_url) = split_media(item.media.as_ref());
        Self {
            name: item.name.to_string(),
            category_id: item.category_id.map(CategoryId::get),
            category_name: item.category_name.as_ref().map(ToString::to_string),
            sku: item.sku.as_ref().map(ToString::to_string),
            price: item.price.map(JewelryPrice::get),
            image_url,
            video_url,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateJewelryItem> for JewelryChangeset {
    fn from(update: &'a DomainUpdateJewelryItem) -> Self {
        let (category_id, category_name) = match &update.category {
            Some((id, name)) => (
                Some(id.get()),
                Some(name.as_ref().map(ToString::to_string)),
            ),
            None => (None, None),
        };
        let (image_url, video_url) = match &update.media {
            Some(media) => {
                let (image, video) = split_media(Some(media));
                (Some(image), Some(video))
            }
            None => (None, None),
        };

        Self {
            name: update.name.as_ref().map(ToString::to_string),
            category_id,
            category_name,
            sku: update.sku.as_ref().map(ToString::to_string),
            price: update.price.map(JewelryPrice::get),
            image_url,
            video_url,
            updated_at: update.updated_at,
        }
    }
}
