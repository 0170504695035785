use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::jewelry::JewelryItem;
use crate::dto::categories::CategoryDto;

/// Jewelry item as returned by the API, with its category embedded when the
/// referenced category still exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JewelryDto {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub category: Option<CategoryDto>,
    pub category_name_snapshot: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub additional_images: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl JewelryDto {
    pub fn new(item: JewelryItem, category: Option<Category>) -> Self {
        let image_url = item.image_url().map(|p| p.as_str().to_string());
        let video_url = item.video_url().map(|p| p.as_str().to_string());
        Self {
            id: item.id.get(),
            name: item.name.into_inner(),
            category_id: item.category_id.map(|id| id.get()),
            category: category.map(CategoryDto::from),
            category_name_snapshot: item.category_name.map(String::from),
            sku: item.sku.map(String::from),
            price: item.price.map(|p| p.get()),
            image_url,
            video_url,
            additional_images: item
                .additional_images
                .into_iter()
                .map(String::from)
                .collect(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<JewelryItem> for JewelryDto {
    fn from(value: JewelryItem) -> Self {
        Self::new(value, None)
    }
}
