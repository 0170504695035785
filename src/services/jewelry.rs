use std::collections::HashMap;

use chrono::Utc;

use crate::domain::category::Category;
use crate::domain::jewelry::{JewelryItem, NewJewelryItem, UpdateJewelryItem};
use crate::domain::types::{CategoryId, CategoryName, JewelryId, MediaPath, PrimaryMedia};
use crate::dto::jewelry::JewelryDto;
use crate::forms::jewelry::{AddJewelryFormPayload, UpdateJewelryFormPayload};
use crate::media::MediaPipeline;
use crate::repository::{
    CategoryReader, CreatedOrder, JewelryListQuery, JewelryReader, JewelryWriter,
};

use super::{ServiceError, ServiceResult, StagedMedia, superseded};

/// Filter applied by [`list_jewelry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JewelryFilter {
    #[default]
    All,
    CategoryId(i32),
    /// Matches the category name stored on the item, not the live category.
    CategoryName(String),
}

impl TryFrom<JewelryFilter> for JewelryListQuery {
    type Error = ServiceError;

    fn try_from(value: JewelryFilter) -> Result<Self, Self::Error> {
        let query = JewelryListQuery::default().order(CreatedOrder::NewestFirst);
        Ok(match value {
            JewelryFilter::All => query,
            JewelryFilter::CategoryId(id) => query.category(CategoryId::new(id)?),
            JewelryFilter::CategoryName(name) => query.category_name(CategoryName::new(name)?),
        })
    }
}

fn find_category<R>(category_id: Option<CategoryId>, repo: &R) -> ServiceResult<Option<Category>>
where
    R: CategoryReader,
{
    let Some(category_id) = category_id else {
        return Ok(None);
    };
    repo.get_category_by_id(category_id).map_err(|e| {
        log::error!("Failed to get category {category_id}: {e}");
        ServiceError::from(e)
    })
}

fn populate<R>(item: JewelryItem, repo: &R) -> ServiceResult<JewelryDto>
where
    R: CategoryReader,
{
    let category = find_category(item.category_id, repo)?;
    Ok(JewelryDto::new(item, category))
}

pub fn list_jewelry<R>(filter: JewelryFilter, repo: &R) -> ServiceResult<Vec<JewelryDto>>
where
    R: JewelryReader + CategoryReader,
{
    let query = JewelryListQuery::try_from(filter)?;

    let items = repo.list_jewelry(query).map_err(|e| {
        log::error!("Failed to list jewelry: {e}");
        ServiceError::from(e)
    })?;
    let categories: HashMap<CategoryId, Category> = repo
        .list_categories(CreatedOrder::NewestFirst)
        .map_err(|e| {
            log::error!("Failed to list categories: {e}");
            ServiceError::from(e)
        })?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| {
            let category = item.category_id.and_then(|id| categories.get(&id).cloned());
            JewelryDto::new(item, category)
        })
        .collect())
}

pub fn get_jewelry<R>(jewelry_id: i32, repo: &R) -> ServiceResult<JewelryDto>
where
    R: JewelryReader + CategoryReader,
{
    let jewelry_id = JewelryId::new(jewelry_id)?;

    match repo.get_jewelry_by_id(jewelry_id) {
        Ok(Some(item)) => populate(item, repo),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get jewelry item: {e}");
            Err(e.into())
        }
    }
}

/// Create an item from the form payload and the staged uploads.
///
/// A staged image wins over a staged video. The category name is copied onto
/// the item; an unknown category leaves the copy empty.
pub fn create_jewelry<R>(
    payload: AddJewelryFormPayload,
    staged: StagedMedia,
    repo: &R,
    media: &MediaPipeline,
) -> ServiceResult<JewelryDto>
where
    R: JewelryWriter + CategoryReader,
{
    let category = match find_category(payload.category_id, repo) {
        Ok(category) => category,
        Err(e) => {
            media.purge(&staged.paths());
            return Err(e);
        }
    };

    let primary = staged.select(media).map(PrimaryMedia::from_path);
    let now = Utc::now().naive_utc();
    let item = NewJewelryItem {
        name: payload.name,
        category_id: payload.category_id,
        category_name: category.as_ref().map(|c| c.name.clone()),
        sku: payload.sku,
        price: payload.price,
        media: primary.clone(),
        additional_images: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    match repo.create_jewelry(&item) {
        Ok(item) => {
            log::info!("Created jewelry item {} ({})", item.id, item.name);
            Ok(JewelryDto::new(item, category))
        }
        Err(e) => {
            log::error!("Failed to create jewelry item: {e}");
            media.purge(&primary.map(|m| m.path().clone()).into_iter().collect::<Vec<_>>());
            Err(e.into())
        }
    }
}

/// Apply a partial update.
///
/// Primary media only changes when a file was uploaded; the new file replaces
/// whatever image or video was stored and the replaced file is deleted.
pub fn update_jewelry<R>(
    jewelry_id: i32,
    payload: UpdateJewelryFormPayload,
    staged: StagedMedia,
    repo: &R,
    media: &MediaPipeline,
) -> ServiceResult<JewelryDto>
where
    R: JewelryReader + JewelryWriter + CategoryReader,
{
    let jewelry_id = match JewelryId::new(jewelry_id) {
        Ok(id) => id,
        Err(e) => {
            media.purge(&staged.paths());
            return Err(e.into());
        }
    };

    let existing = match repo.get_jewelry_by_id(jewelry_id) {
        Ok(Some(item)) => item,
        Ok(None) => {
            media.purge(&staged.paths());
            return Err(ServiceError::NotFound);
        }
        Err(e) => {
            log::error!("Failed to get jewelry item: {e}");
            media.purge(&staged.paths());
            return Err(e.into());
        }
    };

    let category = match find_category(payload.category_id, repo) {
        Ok(category) => category,
        Err(e) => {
            media.purge(&staged.paths());
            return Err(e);
        }
    };

    let primary = staged.select(media).map(PrimaryMedia::from_path);
    let fresh: Vec<MediaPath> = primary.iter().map(|m| m.path().clone()).collect();
    let update = UpdateJewelryItem {
        name: payload.name,
        category: payload
            .category_id
            .map(|id| (id, category.as_ref().map(|c| c.name.clone()))),
        sku: payload.sku,
        price: payload.price,
        media: primary,
        updated_at: Utc::now().naive_utc(),
    };

    match repo.update_jewelry(jewelry_id, &update) {
        Ok(Some(item)) => {
            media.purge(&superseded(existing.media_paths(), &item.media_paths()));
            populate(item, repo)
        }
        Ok(None) => {
            media.purge(&fresh);
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            log::error!("Failed to update jewelry item: {e}");
            media.purge(&fresh);
            Err(e.into())
        }
    }
}

/// Delete an item together with its primary media and gallery files.
pub fn delete_jewelry<R>(jewelry_id: i32, repo: &R, media: &MediaPipeline) -> ServiceResult<()>
where
    R: JewelryWriter,
{
    let jewelry_id = JewelryId::new(jewelry_id)?;

    match repo.delete_jewelry(jewelry_id) {
        Ok(Some(item)) => {
            media.purge(&item.media_paths());
            log::info!("Deleted jewelry item {} ({})", item.id, item.name);
            Ok(())
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete jewelry item: {e}");
            Err(e.into())
        }
    }
}
