use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::domain::types::{CategoryDescription, CategoryName, MediaPath, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial updates; `None` fields are skipped by Diesel.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChangeset {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            image_url: category.image_url.map(MediaPath::new).transpose()?,
            description: category
                .description
                .filter(|d| !d.trim().is_empty())
                .map(CategoryDescription::new)
                .transpose()?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name: category.name.into_inner(),
            image_url: category.image_url.map(String::from),
            description: category.description.map(String::from),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<DomainUpdateCategory> for CategoryChangeset {
    fn from(update: DomainUpdateCategory) -> Self {
        Self {
            name: update.name.map(String::from),
            image_url: update.image_url.map(String::from),
            description: update.description.map(String::from),
            updated_at: update.updated_at,
        }
    }
}
