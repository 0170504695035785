use diesel::prelude::*;

use crate::models::jewelry::JewelryItem;

/// Diesel model representing the `jewelry_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(JewelryItem, foreign_key = jewelry_id))]
#[diesel(table_name = crate::schema::jewelry_images)]
pub struct JewelryImage {
    pub id: i32,
    pub jewelry_id: i32,
    pub position: i32,
    pub url: String,
}

/// Insertable form of [`JewelryImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::jewelry_images)]
pub struct NewJewelryImage {
    pub jewelry_id: i32,
    pub position: i32,
    pub url: String,
}
